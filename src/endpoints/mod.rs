mod assets;
pub mod integration_events;

pub use assets::assets;

pub use integration_events::createuser;
pub use integration_events::syncuser;
