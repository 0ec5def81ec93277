//! `time.*` — intent types and payload parsing.
//!
//! Unlike the state-mutating domains, time commands are executed by the
//! facade itself (they drive the scheduler and the tick loop), so this module
//! only defines the intents and their validation.

use grow_core::CommandError;
use grow_command::PayloadReader;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStartIntent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ticks_per_frame: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStepIntent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSpeedIntent {
    pub multiplier: f64,
}

pub fn parse_start(payload: &Value) -> Result<TimeStartIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("time.start", payload)?;
    let intent = TimeStartIntent {
        game_speed: reader.optional_positive_number("gameSpeed"),
        max_ticks_per_frame: reader.optional_positive_integer("maxTicksPerFrame").map(|n| n as u32),
    };
    reader.finish()?;
    Ok(intent)
}

pub fn parse_empty(command: &str, payload: &Value) -> Result<(), Vec<CommandError>> {
    let reader = PayloadReader::root(command, payload)?;
    reader.finish()?;
    Ok(())
}

pub fn parse_step(payload: &Value) -> Result<TimeStepIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("time.step", payload)?;
    let intent = TimeStepIntent {
        ticks: reader.optional_positive_integer("ticks").map(|n| n as u32),
    };
    reader.finish()?;
    Ok(intent)
}

pub fn parse_set_speed(payload: &Value) -> Result<SetSpeedIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("time.setSpeed", payload)?;
    let intent = SetSpeedIntent {
        multiplier: reader.require_positive_number("multiplier"),
    };
    reader.finish()?;
    Ok(intent)
}
