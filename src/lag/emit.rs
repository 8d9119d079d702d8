use super::aggregate::TopicAggregate;
use std::io::{Result, Write};

/// Writes aggregates as graphite lines: `<scheme>.<group>.<topic>.<field> <value> <timestamp>`.
pub struct MetricEmitter<'a, W: Write> {
    scheme: &'a str,
    group: &'a str,
    timestamp: i64,
    out: W
}

impl<'a, W: Write> MetricEmitter<'a, W> {
    pub fn new(scheme: &'a str, group: &'a str, timestamp: i64, out: W) -> Self {
        MetricEmitter {
            scheme,
            group,
            timestamp,
            out
        }
    }

    pub fn emit(&mut self, aggregate: &TopicAggregate) -> Result<()> {
        writeln!(self.out, "{}.{}.{}.{} {} {}",
            self.scheme, self.group, aggregate.topic, aggregate.field, aggregate.value, self.timestamp)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()
    }
}
