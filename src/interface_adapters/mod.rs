// Interface adapters: wire protocol, view endpoints, console and drawing sinks.

pub mod clients;
pub mod console;
pub mod painter;
pub mod protocol;
