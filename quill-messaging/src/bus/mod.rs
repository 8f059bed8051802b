mod command_bus;
mod event_bus;

pub use command_bus::BrokerCommandBus;
pub use event_bus::BrokerEventBus;
