use crate::error::Error;
use clap::ArgMatches;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BOOTSTRAP: &str = "localhost:9092";
pub const DEFAULT_CLIENT_ID: &str = "check-kafka";
pub const DEFAULT_SCHEME: &str = "sensu.kafka.consumers";
pub const DEFAULT_KAFKA_HOME: &str = "/opt/kafka";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidEndpoint(s.to_owned());
        let mut parts = s.rsplitn(2, ':');
        let port = parts.next().ok_or_else(invalid)?;
        let host = parts.next().ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse().map_err(|_| invalid())?;
        Ok(Endpoint {
            host: host.to_owned(),
            port
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parses a comma separated `host:port` list, keeping the configured order.
pub fn parse_endpoints(list: &str) -> Result<Vec<Endpoint>, Error> {
    let endpoints = split_list(list).into_iter()
        .map(|e| e.parse())
        .collect::<Result<Vec<Endpoint>, Error>>()?;
    if endpoints.is_empty() {
        return Err(Error::NoEndpoints);
    }
    Ok(endpoints)
}

pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone)]
pub struct AliveConfig {
    pub bootstrap: Vec<Endpoint>,
    pub client_id: String
}

impl AliveConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, Error> {
        let bootstrap = parse_endpoints(matches.value_of("bootstrap-servers").unwrap_or(DEFAULT_BOOTSTRAP))?;
        let client_id = matches.value_of("client-id").unwrap_or(DEFAULT_CLIENT_ID).to_owned();
        Ok(AliveConfig {
            bootstrap,
            client_id
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(HashSet<String>);

impl ExclusionSet {
    pub fn contains(&self, topic: &str) -> bool {
        self.0.contains(topic)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> std::iter::FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item=S>>(iter: I) -> Self {
        ExclusionSet(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct ConsumerMetricsConfig {
    pub scheme: String,
    pub group: String,
    pub kafka_home: PathBuf,
    pub topics: Vec<String>,
    pub topic_excludes: ExclusionSet,
    pub bootstrap: Option<String>,
    pub zookeeper: Option<String>
}

impl ConsumerMetricsConfig {
    pub fn new(group: &str) -> Self {
        ConsumerMetricsConfig {
            scheme: DEFAULT_SCHEME.to_owned(),
            group: group.to_owned(),
            kafka_home: PathBuf::from(DEFAULT_KAFKA_HOME),
            topics: Vec::new(),
            topic_excludes: ExclusionSet::default(),
            bootstrap: Some(DEFAULT_BOOTSTRAP.to_owned()),
            zookeeper: None
        }
    }

    pub fn from_matches(matches: &ArgMatches) -> Self {
        let non_empty = |name: &str| matches.value_of(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        ConsumerMetricsConfig {
            scheme: matches.value_of("scheme").unwrap_or(DEFAULT_SCHEME).to_owned(),
            group: matches.value_of("group").unwrap_or_default().to_owned(),
            kafka_home: PathBuf::from(matches.value_of("kafka-home").unwrap_or(DEFAULT_KAFKA_HOME)),
            topics: matches.value_of("topic").map(split_list).unwrap_or_default(),
            topic_excludes: matches.value_of("topic-excludes").map(split_list).unwrap_or_default().into_iter().collect(),
            bootstrap: non_empty("bootstrap"),
            zookeeper: non_empty("zookeeper")
        }
    }

    pub fn describe_tool(&self) -> PathBuf {
        self.kafka_home.join("bin").join("kafka-consumer-groups.sh")
    }
}
