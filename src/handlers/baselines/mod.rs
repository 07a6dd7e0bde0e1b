pub mod create;
pub mod list;
pub mod systems;

pub use create::create as create_baseline;
pub use list::list as list_baselines;
pub use systems::list as list_baseline_systems;
