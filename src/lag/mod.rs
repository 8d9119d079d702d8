pub mod aggregate;
pub mod command;
pub mod emit;
pub mod parse;

use crate::config::ConsumerMetricsConfig;
use crate::error::{Error, Result};
use crate::status::{Outcome, Status};
use aggregate::aggregate;
use command::{CommandRunner, DescribeCommand, SystemRunner};
use emit::MetricEmitter;
use log::{debug, warn};
use parse::Field;
use std::io::Write;

/// Describes the consumer group and writes offset, logsize and lag totals per topic.
pub fn collect_metrics<R: CommandRunner, W: Write>(config: &ConsumerMetricsConfig, runner: &R, out: W, timestamp: i64) -> Result<()> {
    let tool = config.describe_tool();
    if !tool.exists() {
        return Err(Error::MissingTool(tool));
    }

    let command = DescribeCommand::new(config);
    let command_line = command.to_string();
    debug!("running {}", command_line);

    let output = runner.run(&command)?;
    if !output.success {
        match output.code {
            Some(code) => warn!("{} exited with status {}", command_line, code),
            None => warn!("{} was terminated by a signal", command_line)
        }
        return Err(Error::CommandFailed {
            command: command_line,
            output: output.text
        });
    }

    let records = parse::parse(&command_line, &output.text)?;
    debug!("parsed {} partition rows for group {}", records.len(), config.group);

    let mut emitter = MetricEmitter::new(&config.scheme, &config.group, timestamp, out);
    for field in Field::ALL.iter() {
        for total in aggregate(&records, *field, &config.topic_excludes) {
            emitter.emit(&total)?;
        }
    }
    emitter.flush()?;
    Ok(())
}

/// Maps a metrics run to its status. Lag is never judged, a completed run is OK.
pub fn outcome(result: Result<()>) -> Outcome {
    match result {
        Ok(()) => Outcome::ok(),
        Err(e) => {
            warn!("consumer metrics failed: {:?}", e);
            match e.status() {
                Status::Unknown => Outcome::unknown(e.to_string()),
                _ => Outcome::critical(format!("Error: exception: {}", e))
            }
        }
    }
}

pub fn run<W: Write>(config: &ConsumerMetricsConfig, out: W) -> Outcome {
    let timestamp = chrono::Utc::now().timestamp();
    outcome(collect_metrics(config, &SystemRunner, out, timestamp))
}
