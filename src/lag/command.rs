use crate::config::ConsumerMetricsConfig;
use itertools::join;
use std::fmt;
use std::io::Result;
use std::path::PathBuf;
use std::process::Command;

/// A fully built invocation of the consumer group describe tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeCommand {
    pub program: PathBuf,
    pub args: Vec<String>
}

impl DescribeCommand {
    pub fn new(config: &ConsumerMetricsConfig) -> Self {
        let mut args = vec!["--group".to_owned(), config.group.clone(), "--describe".to_owned()];
        if let Some(zookeeper) = &config.zookeeper {
            args.push("--zookeeper".to_owned());
            args.push(zookeeper.clone());
        }
        if let Some(bootstrap) = &config.bootstrap {
            args.push("--bootstrap-server".to_owned());
            args.push(bootstrap.clone());
        }
        for topic in config.topics.iter() {
            args.push("--topic".to_owned());
            args.push(topic.clone());
        }
        DescribeCommand {
            program: config.describe_tool(),
            args
        }
    }
}

impl fmt::Display for DescribeCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        if !self.args.is_empty() {
            write!(f, " {}", join(&self.args, " "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub success: bool,
    /// stdout followed by stderr
    pub text: String
}

pub trait CommandRunner {
    fn run(&self, command: &DescribeCommand) -> Result<CommandOutput>;
}

/// Runs the command as a child process and blocks until it exits.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &DescribeCommand) -> Result<CommandOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        Ok(CommandOutput {
            code: output.status.code(),
            success: output.status.success(),
            text
        })
    }
}
