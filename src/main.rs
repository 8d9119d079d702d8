use clap::*;
use std::io::stdout;

mod alive;
mod config;
mod error;
mod lag;
mod protocol;
mod status;

use config::{AliveConfig, ConsumerMetricsConfig};
use status::{Outcome, Status};

fn app() -> App<'static, 'static> {
    App::new("kafka-probes")
        .version("1.0")
        .author("Joe Frikker <jfrikker@gmail.com>")
        .about("Monitoring probes for Kafka clusters, for use with check and metrics runners")
        .setting(AppSettings::SubcommandRequired)
        .subcommand(SubCommand::with_name("alive")
            .about("Checks that the cluster answers a topic listing")
            .arg(Arg::with_name("bootstrap-servers")
                .short("b")
                .long("bootstrap-servers")
                .alias("bootstrap_servers")
                .value_name("host:port,...")
                .default_value(config::DEFAULT_BOOTSTRAP)
                .help("Comma separated list of Kafka servers and ports")
                .takes_value(true))
            .arg(Arg::with_name("client-id")
                .short("c")
                .long("client-id")
                .value_name("id")
                .default_value(config::DEFAULT_CLIENT_ID)
                .help("Client id sent to the brokers")
                .takes_value(true)))
        .subcommand(SubCommand::with_name("consumer-metrics")
            .about("Prints offset, logsize and lag metrics of a consumer group per topic")
            .arg(Arg::with_name("scheme")
                .short("s")
                .long("scheme")
                .value_name("scheme")
                .default_value(config::DEFAULT_SCHEME)
                .help("Metric naming scheme, text to prepend to metric")
                .takes_value(true))
            .arg(Arg::with_name("group")
                .short("g")
                .long("group")
                .value_name("name")
                .required(true)
                .validator(|g| if g.trim().is_empty() {
                    Err("consumer group must not be empty".to_owned())
                } else {
                    Ok(())
                })
                .help("Consumer group")
                .takes_value(true))
            .arg(Arg::with_name("kafka-home")
                .short("k")
                .long("kafka-home")
                .value_name("path")
                .default_value(config::DEFAULT_KAFKA_HOME)
                .help("Kafka installation containing bin/kafka-consumer-groups.sh")
                .takes_value(true))
            .arg(Arg::with_name("topic")
                .short("t")
                .long("topic")
                .value_name("topic,...")
                .help("Comma separated list of consumer topics")
                .takes_value(true))
            .arg(Arg::with_name("topic-excludes")
                .short("e")
                .long("topic-excludes")
                .value_name("topic,...")
                .help("Comma separated list of topics to leave out")
                .takes_value(true))
            .arg(Arg::with_name("bootstrap")
                .short("b")
                .long("bootstrap")
                .value_name("host:port")
                .default_value(config::DEFAULT_BOOTSTRAP)
                .empty_values(true)
                .help("Kafka bootstrap server, empty to leave out")
                .takes_value(true))
            .arg(Arg::with_name("zookeeper")
                .short("z")
                .long("zookeeper")
                .value_name("host:port")
                .help("Zookeeper address, for describe tools that still need it")
                .takes_value(true)))
}

#[tokio::main(basic_scheduler)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = match app().get_matches_safe() {
        Ok(m) => m,
        Err(e) if e.kind == ErrorKind::HelpDisplayed || e.kind == ErrorKind::VersionDisplayed => e.exit(),
        Err(e) => {
            println!("{}", e.message);
            std::process::exit(Status::Unknown.exit_code());
        }
    };

    match matches.subcommand() {
        ("alive", Some(m)) => {
            let outcome = match AliveConfig::from_matches(m) {
                Ok(config) => alive::run(&config).await,
                Err(e) => Outcome::critical(format!("Error: {}", e))
            };
            println!("{}", outcome.check_line(alive::CHECK_NAME));
            outcome.exit()
        },
        ("consumer-metrics", Some(m)) => {
            let config = ConsumerMetricsConfig::from_matches(m);
            let outcome = lag::run(&config, stdout());
            if let Some(message) = &outcome.message {
                println!("{}", message);
            }
            outcome.exit()
        },
        _ => unreachable!("clap enforces a subcommand")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_metrics_defaults() {
        let matches = app().get_matches_from_safe(vec!["kafka-probes", "consumer-metrics", "-g", "mygroup"]).unwrap();
        let config = ConsumerMetricsConfig::from_matches(matches.subcommand_matches("consumer-metrics").unwrap());
        assert_eq!(config.scheme, "sensu.kafka.consumers");
        assert_eq!(config.group, "mygroup");
        assert_eq!(config.bootstrap.as_deref(), Some("localhost:9092"));
        assert_eq!(config.zookeeper, None);
        assert!(config.topics.is_empty());
        assert!(config.topic_excludes.is_empty());
    }

    #[test]
    fn consumer_metrics_lists() {
        let matches = app().get_matches_from_safe(vec![
            "kafka-probes", "consumer-metrics", "-g", "mygroup", "-t", "a,b", "-e", "b", "-b", "",
        ]).unwrap();
        let config = ConsumerMetricsConfig::from_matches(matches.subcommand_matches("consumer-metrics").unwrap());
        assert_eq!(config.topics, vec!["a", "b"]);
        assert!(config.topic_excludes.contains("b"));
        assert_eq!(config.bootstrap, None);
    }

    #[test]
    fn group_is_required() {
        assert!(app().get_matches_from_safe(vec!["kafka-probes", "consumer-metrics"]).is_err());
        assert!(app().get_matches_from_safe(vec!["kafka-probes", "consumer-metrics", "-g", " "]).is_err());
    }

    #[test]
    fn alive_accepts_underscore_flag() {
        let matches = app().get_matches_from_safe(vec!["kafka-probes", "alive", "--bootstrap_servers", "k1:9092"]).unwrap();
        let config = AliveConfig::from_matches(matches.subcommand_matches("alive").unwrap()).unwrap();
        assert_eq!(config.bootstrap[0].to_string(), "k1:9092");
    }

    #[test]
    fn alive_bootstrap_list() {
        let matches = app().get_matches_from_safe(vec!["kafka-probes", "alive", "-b", "k1:9092,k2:9093"]).unwrap();
        let config = AliveConfig::from_matches(matches.subcommand_matches("alive").unwrap()).unwrap();
        assert_eq!(config.bootstrap.len(), 2);
        assert_eq!(config.client_id, "check-kafka");
    }
}
