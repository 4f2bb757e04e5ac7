use eyre::{Result, WrapErr};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
    ReadBuf,
};
use tracing::{debug, warn};

use downsampling::{Codec, CsvCodec, Format, JsonCodec, Point};

pub type XY = Point<f64, f64>;

#[derive(Debug)]
pub enum Input {
    Stdin(BufReader<tokio::io::Stdin>),
    File(BufReader<File>),
}

impl Input {
    pub async fn from_filename(name: &str) -> Result<Self> {
        match name {
            "stdin" => Ok(Input::Stdin(BufReader::new(tokio::io::stdin()))),
            _ => {
                let f = File::open(name)
                    .await
                    .wrap_err_with(|| format!("opening {}", name))?;
                Ok(Input::File(BufReader::new(f)))
            }
        }
    }

    /// Peeks at the first byte to tell JSON from CSV. None for empty input.
    pub async fn detect_format(&mut self) -> Result<Option<Format>> {
        let buf = self.fill_buf().await?;
        Ok(buf.first().map(|&b| Format::detect(b)))
    }

    pub async fn decode(&mut self, format: Format) -> Result<Option<XY>> {
        match format {
            Format::Json => JsonCodec.decode(self).await,
            Format::Csv => CsvCodec.decode(self).await,
        }
    }
}

impl AsyncRead for Input {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).poll_read(cx, buf),
            Input::File(reader) => Pin::new(reader).poll_read(cx, buf),
        }
    }
}

impl AsyncBufRead for Input {
    fn poll_fill_buf(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).poll_fill_buf(cx),
            Input::File(reader) => Pin::new(reader).poll_fill_buf(cx),
        }
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).consume(amt),
            Input::File(reader) => Pin::new(reader).consume(amt),
        }
    }
}

#[derive(Debug)]
pub enum Output {
    Stdout(BufWriter<tokio::io::Stdout>),
    File(BufWriter<File>),
}

impl Output {
    pub async fn from_filename(name: &str) -> Result<Self> {
        match name {
            "stdout" => Ok(Output::Stdout(BufWriter::new(tokio::io::stdout()))),
            _ => {
                let f = File::create(name)
                    .await
                    .wrap_err_with(|| format!("creating {}", name))?;
                Ok(Output::File(BufWriter::new(f)))
            }
        }
    }

    pub async fn encode(&mut self, format: Format, point: &XY) -> Result<()> {
        match format {
            Format::Json => JsonCodec.encode(self, point).await,
            Format::Csv => CsvCodec.encode(self, point).await,
        }
    }
}

impl AsyncWrite for Output {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_write(cx, buf),
            Output::File(writer) => Pin::new(writer).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_flush(cx),
            Output::File(writer) => Pin::new(writer).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_shutdown(cx),
            Output::File(writer) => Pin::new(writer).poll_shutdown(cx),
        }
    }
}

/// Input files, or stdin when none are given.
pub fn sources(files: &[String]) -> Vec<String> {
    if files.is_empty() {
        vec!["stdin".to_string()]
    } else {
        files.to_vec()
    }
}

/// Reads every point of every source, in order. Returns the points and the
/// encoding of the first non-empty source.
pub async fn read_points(files: &[String]) -> Result<(Vec<XY>, Option<Format>)> {
    let mut points = Vec::new();
    let mut first_format = None;

    for source in &sources(files) {
        let mut input = Input::from_filename(source).await?;
        let Some(format) = input.detect_format().await? else {
            continue;
        };
        first_format.get_or_insert(format);

        let before = points.len();
        loop {
            match input.decode(format).await {
                Ok(Some(point)) => points.push(point),
                Ok(None) => break,
                Err(e) => {
                    warn!(source = %source, "error decoding points: {}", e);
                    break;
                }
            }
        }
        debug!(source = %source, %format, points = points.len() - before, "read points");
    }

    Ok((points, first_format))
}

pub async fn write_points(name: &str, format: Format, points: &[XY]) -> Result<()> {
    let mut output = Output::from_filename(name).await?;
    for point in points {
        output.encode(format, point).await?;
    }
    output.flush().await?;
    Ok(())
}
