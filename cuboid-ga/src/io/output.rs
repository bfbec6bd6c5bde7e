use cuboid::io::ext_repr::{ExtJob, ExtResult};
use serde::{Deserialize, Serialize};

use crate::config::GAConfig;

#[derive(Serialize, Deserialize, Clone)]
pub struct GAOutput {
    pub job: ExtJob,
    pub result: ExtResult,
    pub config: GAConfig,
}
