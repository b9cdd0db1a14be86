//! Opt-in behavioral contracts and the per-type record that holds them.
//!
//! A block type carries any subset of these traits as shared trait objects.
//! Presence is a bit test on [`CapabilitySet`]; there is no type hierarchy.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use lode_geom::BlockPos;
use rand::RngCore;

use crate::registry::Catalog;
use crate::types::BlockState;
use crate::weathering::WeatherState;
use crate::world::{
    Attachment, AttachmentKind, DamageSource, Dimension, Entity, FallingBlock, Fluid, ItemPayload,
    SoundId, World,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    EntityContainer,
    FallReactive,
    LiquidContainer,
    Portal,
    BonemealGrowable,
    BucketPickup,
    Weatherable,
    RandomTicking,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::EntityContainer,
        Capability::FallReactive,
        Capability::LiquidContainer,
        Capability::Portal,
        Capability::BonemealGrowable,
        Capability::BucketPickup,
        Capability::Weatherable,
        Capability::RandomTicking,
    ];

    pub fn flag(self) -> CapabilitySet {
        match self {
            Capability::EntityContainer => CapabilitySet::ENTITY_CONTAINER,
            Capability::FallReactive => CapabilitySet::FALL_REACTIVE,
            Capability::LiquidContainer => CapabilitySet::LIQUID_CONTAINER,
            Capability::Portal => CapabilitySet::PORTAL,
            Capability::BonemealGrowable => CapabilitySet::BONEMEAL_GROWABLE,
            Capability::BucketPickup => CapabilitySet::BUCKET_PICKUP,
            Capability::Weatherable => CapabilitySet::WEATHERABLE,
            Capability::RandomTicking => CapabilitySet::RANDOM_TICKING,
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CapabilitySet: u8 {
        const ENTITY_CONTAINER = 1 << 0;
        const FALL_REACTIVE = 1 << 1;
        const LIQUID_CONTAINER = 1 << 2;
        const PORTAL = 1 << 3;
        const BONEMEAL_GROWABLE = 1 << 4;
        const BUCKET_PICKUP = 1 << 5;
        const WEATHERABLE = 1 << 6;
        const RANDOM_TICKING = 1 << 7;
    }
}

/// Per-tick callback for a block's attachment.
pub type Ticker = fn(&Catalog, &mut dyn World, BlockPos, BlockState);

/// `ticker` if the requested attachment kind is the one the block owns.
pub fn ticker_if_kind(
    requested: AttachmentKind,
    expected: AttachmentKind,
    ticker: Ticker,
) -> Option<Ticker> {
    (requested == expected).then_some(ticker)
}

/// Blocks that own auxiliary per-position data.
pub trait EntityContainer: Send + Sync {
    fn attachment_kind(&self) -> AttachmentKind;

    /// Fresh attachment for a newly placed state; `None` if this state has none.
    fn create_attachment(&self, pos: BlockPos, state: BlockState) -> Option<Attachment>;

    /// Ticker for a live attachment of `kind`. A kind mismatch yields `None`.
    fn ticker_for(&self, _state: BlockState, _kind: AttachmentKind) -> Option<Ticker> {
        None
    }
}

/// Reactions of a block to having fallen as an entity.
pub trait FallReactive: Send + Sync {
    fn on_land(
        &self,
        _catalog: &Catalog,
        _world: &mut dyn World,
        _pos: BlockPos,
        _replaced: BlockState,
        _falling: &FallingBlock,
    ) {
    }

    fn on_broken_after_fall(
        &self,
        _catalog: &Catalog,
        _world: &mut dyn World,
        _pos: BlockPos,
        _falling: &FallingBlock,
    ) {
    }

    fn fall_damage_source(&self, _entity: &Entity) -> DamageSource {
        DamageSource::FallingBlock
    }
}

pub trait LiquidContainer: Send + Sync {
    fn can_place_liquid(
        &self,
        catalog: &Catalog,
        world: &dyn World,
        pos: BlockPos,
        state: BlockState,
        fluid: Fluid,
    ) -> bool;

    /// Returns whether the liquid was placed.
    fn place_liquid(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        pos: BlockPos,
        state: BlockState,
        fluid: Fluid,
    ) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    Confusion,
    None,
}

/// Where a portal sends an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub dimension: Dimension,
    pub pos: BlockPos,
}

pub trait Portal: Send + Sync {
    fn destination_for(&self, world: &dyn World, pos: BlockPos, entity: &Entity)
    -> Option<Transition>;

    fn transition_time_ticks(&self, _entity: &Entity) -> u32 {
        0
    }

    fn local_transition(&self) -> TransitionKind {
        TransitionKind::None
    }
}

/// Bonemeal protocol: callers check `is_valid_target`, then `roll_success`,
/// and only on success call `apply_growth`. The order is not enforced here.
pub trait BonemealGrowable: Send + Sync {
    fn is_valid_target(
        &self,
        catalog: &Catalog,
        world: &dyn World,
        pos: BlockPos,
        state: BlockState,
    ) -> bool;

    fn roll_success(&self, _rng: &mut dyn RngCore, _pos: BlockPos, _state: BlockState) -> bool {
        true
    }

    fn apply_growth(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        pos: BlockPos,
        state: BlockState,
    );
}

pub trait BucketPickup: Send + Sync {
    fn pickup(
        &self,
        catalog: &Catalog,
        user: Option<&Entity>,
        world: &mut dyn World,
        pos: BlockPos,
        state: BlockState,
    ) -> ItemPayload;

    fn pickup_sound(&self) -> Option<SoundId> {
        None
    }
}

/// Stage tag of a weathering block. The next stage's block type is resolved by
/// [`Catalog::next_stage_type`].
pub trait Weatherable: Send + Sync {
    fn current_stage(&self) -> WeatherState;

    /// Shape family the stages chain within, e.g. `block` or `bars`.
    fn family(&self) -> &'static str;
}

pub trait RandomTicking: Send + Sync {
    fn is_randomly_ticking(&self, catalog: &Catalog, state: BlockState) -> bool;

    fn random_tick(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        pos: BlockPos,
        state: BlockState,
    );
}

/// The capability implementations a block type opted into.
#[derive(Clone, Default)]
pub struct Capabilities {
    set: CapabilitySet,
    pub(crate) entity_container: Option<Arc<dyn EntityContainer>>,
    pub(crate) fall_reactive: Option<Arc<dyn FallReactive>>,
    pub(crate) liquid_container: Option<Arc<dyn LiquidContainer>>,
    pub(crate) portal: Option<Arc<dyn Portal>>,
    pub(crate) bonemeal: Option<Arc<dyn BonemealGrowable>>,
    pub(crate) bucket_pickup: Option<Arc<dyn BucketPickup>>,
    pub(crate) weatherable: Option<Arc<dyn Weatherable>>,
    pub(crate) random_ticking: Option<Arc<dyn RandomTicking>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set(&self) -> CapabilitySet {
        self.set
    }

    #[inline]
    pub fn has(&self, capability: Capability) -> bool {
        self.set.contains(capability.flag())
    }

    pub fn with_entity_container(mut self, imp: Arc<dyn EntityContainer>) -> Self {
        self.entity_container = Some(imp);
        self.set |= CapabilitySet::ENTITY_CONTAINER;
        self
    }

    pub fn with_fall_reactive(mut self, imp: Arc<dyn FallReactive>) -> Self {
        self.fall_reactive = Some(imp);
        self.set |= CapabilitySet::FALL_REACTIVE;
        self
    }

    pub fn with_liquid_container(mut self, imp: Arc<dyn LiquidContainer>) -> Self {
        self.liquid_container = Some(imp);
        self.set |= CapabilitySet::LIQUID_CONTAINER;
        self
    }

    pub fn with_portal(mut self, imp: Arc<dyn Portal>) -> Self {
        self.portal = Some(imp);
        self.set |= CapabilitySet::PORTAL;
        self
    }

    pub fn with_bonemeal(mut self, imp: Arc<dyn BonemealGrowable>) -> Self {
        self.bonemeal = Some(imp);
        self.set |= CapabilitySet::BONEMEAL_GROWABLE;
        self
    }

    pub fn with_bucket_pickup(mut self, imp: Arc<dyn BucketPickup>) -> Self {
        self.bucket_pickup = Some(imp);
        self.set |= CapabilitySet::BUCKET_PICKUP;
        self
    }

    pub fn with_weatherable(mut self, imp: Arc<dyn Weatherable>) -> Self {
        self.weatherable = Some(imp);
        self.set |= CapabilitySet::WEATHERABLE;
        self
    }

    pub fn with_random_ticking(mut self, imp: Arc<dyn RandomTicking>) -> Self {
        self.random_ticking = Some(imp);
        self.set |= CapabilitySet::RANDOM_TICKING;
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Capabilities").field(&self.set).finish()
    }
}
