// Motion tuning, kept apart from runtime configuration.

pub mod customer;
pub mod truck;

pub use customer::{CustomerTuning, DispersalTuning};
pub use truck::TruckTuning;

#[derive(Debug, Clone, Copy, Default)]
pub struct SceneTuning {
    pub truck: TruckTuning,
    pub customer: CustomerTuning,
    pub dispersal: DispersalTuning,
}
