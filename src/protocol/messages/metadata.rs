use super::super::request::*;

#[derive(Debug, Clone)]
pub struct Request {
    pub topics: Option<Vec<String>>,
    pub allow_auto_topic_creation: bool
}

impl KafkaSerializable for Request {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        self.topics.serialize(out)?;
        self.allow_auto_topic_creation.serialize(out)
    }
}

impl KafkaRequest for Request {
    type Response = Response;

    fn api_key() -> i16 {
        3
    }

    fn api_version() -> i16 {
        6
    }
}

/// Metadata v6 response, decoded only as far as a reachability check needs.
/// Per-partition details are read past and dropped.
#[derive(Debug, Clone)]
pub struct Response {
    pub broker_count: usize,
    pub cluster_id: Option<String>,
    pub topics: Vec<Topic>
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub error_code: i16,
    pub name: String,
    pub partition_count: usize
}

impl Response {
    pub fn topic_names(&self) -> impl Iterator<Item=&str> {
        self.topics.iter().map(|t| t.name.as_str())
    }
}

fn array_len<R: Read>(stream: &mut R) -> Result<usize> {
    Ok(i32::deserialize(stream)?.max(0) as usize)
}

fn skip_broker<R: Read>(stream: &mut R) -> Result<()> {
    i32::deserialize(stream)?;
    String::deserialize(stream)?;
    i32::deserialize(stream)?;
    Option::<String>::deserialize(stream)?;
    Ok(())
}

fn skip_partition<R: Read>(stream: &mut R) -> Result<()> {
    i16::deserialize(stream)?;
    i32::deserialize(stream)?;
    i32::deserialize(stream)?;
    // replicas, isr, offline replicas
    for _ in 0..3 {
        Vec::<i32>::deserialize(stream)?;
    }
    Ok(())
}

impl KafkaDeserializable for Response {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self> {
        i32::deserialize(stream)?;
        let broker_count = array_len(stream)?;
        for _ in 0..broker_count {
            skip_broker(stream)?;
        }
        let cluster_id = Option::<String>::deserialize(stream)?;
        i32::deserialize(stream)?;
        let topics = Vec::<Topic>::deserialize(stream)?;
        Ok(Response {
            broker_count,
            cluster_id,
            topics
        })
    }
}

impl KafkaDeserializable for Topic {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self> {
        let error_code = i16::deserialize(stream)?;
        let name = String::deserialize(stream)?;
        bool::deserialize(stream)?;
        let partition_count = array_len(stream)?;
        for _ in 0..partition_count {
            skip_partition(stream)?;
        }
        Ok(Topic {
            error_code,
            name,
            partition_count
        })
    }
}
