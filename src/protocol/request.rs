pub use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
pub use std::io::{Error, ErrorKind, Read, Result, Write};

pub trait KafkaSerializable {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()>;
}

pub trait KafkaDeserializable: Sized {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self>;
}

pub trait KafkaRequest: KafkaSerializable {
    type Response: KafkaDeserializable;
    fn api_key() -> i16;
    fn api_version() -> i16;
}

fn invalid_data(msg: String) -> Error {
    Error::new(ErrorKind::InvalidData, msg)
}

fn read_bytes<R: Read>(stream: &mut R, len: usize) -> Result<String> {
    let mut data = vec!(0; len);
    stream.read_exact(&mut data)?;
    String::from_utf8(data).map_err(|e| invalid_data(format!("string is not valid UTF-8: {}", e)))
}

impl KafkaSerializable for bool {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_u8(if *self { 1 } else { 0 })
    }
}

impl KafkaDeserializable for bool {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self> {
        Ok(stream.read_u8()? != 0)
    }
}

impl KafkaSerializable for i16 {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_i16::<BigEndian>(*self)
    }
}

impl KafkaDeserializable for i16 {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self> {
        stream.read_i16::<BigEndian>()
    }
}

impl KafkaSerializable for i32 {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_i32::<BigEndian>(*self)
    }
}

impl KafkaDeserializable for i32 {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self> {
        stream.read_i32::<BigEndian>()
    }
}

impl KafkaSerializable for str {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.len() > i16::max_value() as usize {
            return Err(Error::new(ErrorKind::InvalidInput, "string too long for the Kafka protocol"));
        }
        (self.len() as i16).serialize(out)?;
        out.write_all(self.as_bytes())
    }
}

impl KafkaSerializable for String {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        self.as_str().serialize(out)
    }
}

impl KafkaDeserializable for String {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self> {
        let len = i16::deserialize(stream)?;
        if len < 0 {
            return Err(invalid_data(format!("negative length {} for non-nullable string", len)));
        }
        read_bytes(stream, len as usize)
    }
}

impl KafkaDeserializable for Option<String> {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self> {
        let len = i16::deserialize(stream)?;
        if len < 0 {
            Ok(None)
        } else {
            read_bytes(stream, len as usize).map(Some)
        }
    }
}

impl <T: KafkaSerializable> KafkaSerializable for Vec<T> {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        (self.len() as i32).serialize(out)?;
        for i in self.iter() {
            i.serialize(out)?;
        }
        Ok(())
    }
}

impl <T: KafkaDeserializable> KafkaDeserializable for Vec<T> {
    fn deserialize<R: Read>(stream: &mut R) -> Result<Self> {
        let len = i32::deserialize(stream)?;
        let mut result = Vec::new();
        for _ in 0..len {
            result.push(T::deserialize(stream)?);
        }
        Ok(result)
    }
}

impl <T: KafkaSerializable> KafkaSerializable for Option<Vec<T>> {
    fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        match self {
            None => (-1 as i32).serialize(out),
            Some(v) => v.serialize(out)
        }
    }
}
