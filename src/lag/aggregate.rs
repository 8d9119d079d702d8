use super::parse::{ConsumerRecord, Field};
use crate::config::ExclusionSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicAggregate {
    pub topic: String,
    pub field: Field,
    pub value: i64
}

/// Sums `field` over all records of each topic, in first seen topic order,
/// then drops excluded topics. Sums saturate at `i64::MAX`.
pub fn aggregate(records: &[ConsumerRecord], field: Field, excludes: &ExclusionSet) -> Vec<TopicAggregate> {
    let mut totals: Vec<TopicAggregate> = Vec::new();

    for record in records {
        let value = record.value(field);
        match totals.iter_mut().find(|t| t.topic == record.topic) {
            Some(total) => total.value = total.value.saturating_add(value),
            None => totals.push(TopicAggregate {
                topic: record.topic.clone(),
                field,
                value
            })
        }
    }

    if !excludes.is_empty() {
        totals.retain(|t| !excludes.contains(&t.topic));
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lag::parse::parse;

    const DESCRIBE: &str = "\
GROUP  TOPIC  PARTITION  CURRENT-OFFSET  LOG-END-OFFSET  LAG  CONSUMER-ID  HOST  CLIENT-ID
mygroup topicA 0 100 150 50 c1 h1 cl1
mygroup topicA 1 200 200 0  c2 h2 cl2
mygroup topicB 0 10  20  10 c3 h3 cl3
";

    fn totals(aggregates: &[TopicAggregate]) -> Vec<(&str, i64)> {
        aggregates.iter().map(|a| (a.topic.as_str(), a.value)).collect()
    }

    #[test]
    fn sums_per_topic() {
        let records = parse("describe", DESCRIBE).unwrap();
        let none = ExclusionSet::default();
        assert_eq!(totals(&aggregate(&records, Field::Lag, &none)), vec![("topicA", 50), ("topicB", 10)]);
        assert_eq!(totals(&aggregate(&records, Field::Offset, &none)), vec![("topicA", 300), ("topicB", 10)]);
        assert_eq!(totals(&aggregate(&records, Field::Logsize, &none)), vec![("topicA", 350), ("topicB", 20)]);
    }

    #[test]
    fn excluded_topics_are_dropped() {
        let records = parse("describe", DESCRIBE).unwrap();
        let excludes: ExclusionSet = vec!["topicB"].into_iter().collect();
        assert_eq!(totals(&aggregate(&records, Field::Lag, &excludes)), vec![("topicA", 50)]);
    }

    #[test]
    fn non_numeric_rows_contribute_zero() {
        let records = parse("describe", "orders 0 5 9 4\norders 1 - - -\n").unwrap();
        let result = aggregate(&records, Field::Lag, &ExclusionSet::default());
        assert_eq!(result, vec![TopicAggregate { topic: "orders".into(), field: Field::Lag, value: 4 }]);
    }

    #[test]
    fn huge_sums_saturate() {
        let records = parse("describe", "orders 0 0 9223372036854775807 0\norders 1 0 1 0\n").unwrap();
        let result = aggregate(&records, Field::Logsize, &ExclusionSet::default());
        assert_eq!(result[0].value, i64::max_value());
    }

    #[test]
    fn aggregation_is_repeatable() {
        let records = parse("describe", DESCRIBE).unwrap();
        let none = ExclusionSet::default();
        assert_eq!(aggregate(&records, Field::Offset, &none), aggregate(&records, Field::Offset, &none));
    }

    #[test]
    fn no_records_no_aggregates() {
        assert!(aggregate(&[], Field::Lag, &ExclusionSet::default()).is_empty());
    }
}
