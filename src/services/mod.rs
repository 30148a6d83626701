//! Services module - the unleveling engine.
//!
//! Every stage reads winning records from a [`RecordStore`](crate::store::RecordStore),
//! mutates clones and commits the results to a [`Changeset`](crate::store::Changeset).
//! Nothing here touches the filesystem; loading and saving live in
//! [`crate::config`] and [`crate::store`].
//!
//! # Components
//!
//! - [`matching`]: first-match-wins evaluation of the `keys` / `forbidden_keys` rule documents
//! - [`leveled_lists`]: [`LeveledListSplitter`] prunes, splits and unlevels leveled item lists:
//!   - artifact lists are culled down to their highest-level entries
//!   - other lists gain `_Weak` / `_Strong` siblings split at a level threshold
//!   - every entry ends up at level 1
//! - [`rescaler`]: [`StatRescaler`] maps armor and weapon stats onto a baseline curve
//!   ([`baseline`]) and caps tempering through game settings
//! - [`outfits`]: [`OutfitRewriter`] creates weak/strong outfit variants that point at the
//!   split leveled lists
//! - [`zones`]: [`ZoneLeveler`] rolls new level bands for encounter zones
//! - [`npcs`]: [`NpcLeveler`] fixes NPC levels and rebuilds classes, equipment, skills and perks
//! - [`patcher`]: [`Patcher`] runs the enabled stages in order
//!
//! # Design Philosophy
//!
//! The services layer is designed to be:
//! - **Deterministic**: all randomness goes through a seeded [`LevelRoller`]
//! - **Testable**: stores, rollers and settings are explicit parameters
//! - **Ordered**: later stages resolve records created by earlier ones through
//!   [`PatchView`](crate::store::PatchView)
//!
//! # Usage Example
//!
//! ```ignore
//! use unleveler::services::Patcher;
//!
//! let store = MemoryStore::load("snapshot.yaml")?;
//! let metrics = Metrics::new();
//! let changeset = Patcher::new(&settings, &rules).run(&store, &metrics)?;
//! changeset.save("unleveler-patch.yaml")?;
//! ```

pub mod baseline;
pub mod game_settings;
pub mod leveled_lists;
pub mod matching;
pub mod npcs;
pub mod outfits;
pub mod patcher;
pub mod rescaler;
pub mod roller;
pub mod zones;

pub use baseline::BaselineTable;
pub use leveled_lists::LeveledListSplitter;
pub use matching::MatchMode;
pub use npcs::{NpcLeveler, StepResult};
pub use outfits::OutfitRewriter;
pub use patcher::Patcher;
pub use rescaler::StatRescaler;
pub use roller::{LevelRoller, SeededRoller};
pub use zones::ZoneLeveler;
