use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use eyre::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};

use crate::Point;

// A Codec reads and writes points one record at a time.
#[async_trait]
pub trait Codec {
    async fn encode<W, X, Y>(&self, writer: &mut W, point: &Point<X, Y>) -> Result<()>
    where
        W: AsyncWrite + Unpin + Send,
        X: Serialize + Sync,
        Y: Serialize + Sync;

    // Decode returns None once the reader is exhausted.
    async fn decode<R, X, Y>(&self, reader: &mut R) -> Result<Option<Point<X, Y>>>
    where
        R: AsyncBufRead + Unpin + Send,
        X: DeserializeOwned + Send,
        Y: DeserializeOwned + Send;
}

// Reads the next line that is not blank, without its line terminator.
async fn next_line<R: AsyncBufRead + Unpin + Send>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf).await? == 0 {
            return Ok(None);
        }
        let line = buf.trim();
        if !line.is_empty() {
            return Ok(Some(line.to_string()));
        }
    }
}

/// One `{"x":..,"y":..}` object per line.
pub struct JsonCodec;

#[async_trait]
impl Codec for JsonCodec {
    async fn encode<W, X, Y>(&self, writer: &mut W, point: &Point<X, Y>) -> Result<()>
    where
        W: AsyncWrite + Unpin + Send,
        X: Serialize + Sync,
        Y: Serialize + Sync,
    {
        let mut buf = serde_json::to_vec(point)?;
        buf.push(b'\n');
        writer.write_all(&buf).await?;
        Ok(())
    }

    async fn decode<R, X, Y>(&self, reader: &mut R) -> Result<Option<Point<X, Y>>>
    where
        R: AsyncBufRead + Unpin + Send,
        X: DeserializeOwned + Send,
        Y: DeserializeOwned + Send,
    {
        let Some(line) = next_line(reader).await? else {
            return Ok(None);
        };
        serde_json::from_str(&line)
            .map(Some)
            .map_err(|e| eyre::eyre!("invalid JSON point {:?}: {}", line, e))
    }
}

/// One headerless `x,y` record per line.
pub struct CsvCodec;

#[async_trait]
impl Codec for CsvCodec {
    async fn encode<W, X, Y>(&self, writer: &mut W, point: &Point<X, Y>) -> Result<()>
    where
        W: AsyncWrite + Unpin + Send,
        X: Serialize + Sync,
        Y: Serialize + Sync,
    {
        let buf = {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(Vec::new());
            wtr.serialize((&point.x, &point.y))?;
            wtr.into_inner()
                .map_err(|e| eyre::eyre!("flushing CSV record: {}", e.error()))?
        };
        writer.write_all(&buf).await?;
        Ok(())
    }

    async fn decode<R, X, Y>(&self, reader: &mut R) -> Result<Option<Point<X, Y>>>
    where
        R: AsyncBufRead + Unpin + Send,
        X: DeserializeOwned + Send,
        Y: DeserializeOwned + Send,
    {
        let Some(line) = next_line(reader).await? else {
            return Ok(None);
        };
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(line.as_bytes());
        match rdr.deserialize::<(X, Y)>().next() {
            Some(record) => {
                let (x, y) =
                    record.map_err(|e| eyre::eyre!("invalid CSV point {:?}: {}", line, e))?;
                Ok(Some(Point { x, y }))
            }
            None => eyre::bail!("no CSV record in {:?}", line),
        }
    }
}

/// Encoding of a point stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Guesses the encoding of a stream from its first byte.
    pub fn detect(first: u8) -> Format {
        if first == b'{' {
            Format::Json
        } else {
            Format::Csv
        }
    }
}

impl FromStr for Format {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            other => eyre::bail!("unknown encoding: {}", other),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Format::Csv => write!(f, "csv"),
            Format::Json => write!(f, "json"),
        }
    }
}
