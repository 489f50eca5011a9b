// author: kodeholic (powered by Claude)

pub mod api;

pub use api::{BrandmeisterApi, ClientStatus, ReflectorState, StatusLookup, Subscription};
