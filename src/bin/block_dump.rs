use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use bytes::BytesMut;
use clap::{Parser, ValueEnum};
use serde_json::{Map, Value as JsonValue};
use tracing::info;

use ch_native::codec::CodecError;
use ch_native::codec::block::{Block, BlockReader};
use ch_native::codec::column::{Representation, TypeRegistry};
use ch_native::codec::compression::CompressedBlockReader;
use ch_native::codec::cursor::ByteCursor;
use ch_native::codec::packet::{PacketReader, ServerPacket};
use ch_native::codec::settings::{CodecSettings, Compression};
use ch_native::logging;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Repr {
    Native,
    Text,
    Number,
    Bytes,
}

impl From<Repr> for Representation {
    fn from(r: Repr) -> Self {
        match r {
            Repr::Native => Representation::Native,
            Repr::Text => Representation::Text,
            Repr::Number => Representation::Number,
            Repr::Bytes => Representation::Bytes,
        }
    }
}

/// Bare block stream, plain or inside LZ4 frames.
enum Blocks {
    Plain(BlockReader),
    Lz4(CompressedBlockReader),
}

impl Blocks {
    fn read<C: ByteCursor>(&mut self, cursor: &mut C) -> Result<Option<Block>, CodecError> {
        match self {
            Blocks::Plain(reader) => reader.read(cursor),
            Blocks::Lz4(reader) => reader.read(cursor),
        }
    }

    fn is_idle(&self) -> bool {
        match self {
            Blocks::Plain(reader) => reader.is_idle(),
            Blocks::Lz4(reader) => reader.is_idle(),
        }
    }
}

#[derive(Parser)]
#[command(name = "block_dump")]
#[command(about = "Decode native protocol blocks and print rows as JSON lines", long_about = None)]
struct Args {
    /// File holding raw native blocks (or server packets with --packets)
    input: PathBuf,

    /// Bytes handed to the decoder per step
    #[arg(short, long, default_value = "4096")]
    chunk_size: usize,

    /// Input is a server packet stream rather than bare blocks
    #[arg(long)]
    packets: bool,

    /// Protocol revision, overriding the configured one
    #[arg(long)]
    revision: Option<u64>,

    /// Input blocks are wrapped in LZ4 frames
    #[arg(long)]
    lz4: bool,

    #[arg(short, long, value_enum, default_value = "native")]
    representation: Repr,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init()?;

    if args.chunk_size == 0 {
        bail!("chunk size must be positive");
    }
    let mut settings = CodecSettings::from_config()?;
    if let Some(revision) = args.revision {
        settings = settings.with_revision(revision);
    }
    if args.lz4 {
        settings = settings.with_compression(Compression::Lz4);
    }
    let registry = TypeRegistry::new(settings);
    let raw = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!(bytes = raw.len(), path = %args.input.display(), "decoding input");

    let repr = Representation::from(args.representation);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut buffer = BytesMut::new();
    let mut blocks = match registry.settings().compression {
        Compression::None => Blocks::Plain(BlockReader::new(registry.clone())),
        Compression::Lz4 => Blocks::Lz4(CompressedBlockReader::new(registry.clone())),
    };
    let mut packets = PacketReader::new(registry);

    for chunk in raw.chunks(args.chunk_size) {
        buffer.extend_from_slice(chunk);
        loop {
            if args.packets {
                match packets.read(&mut buffer) {
                    Ok(Some(packet)) => print_packet(&mut out, &packet, repr)?,
                    Ok(None) => break,
                    Err(e) => {
                        e.log_error();
                        if e.is_fatal() {
                            return Err(e.into());
                        }
                    }
                }
            } else {
                match blocks.read(&mut buffer)? {
                    Some(block) => print_block(&mut out, &block, repr)?,
                    None => break,
                }
            }
        }
    }

    let idle = if args.packets {
        packets.is_idle() && buffer.is_empty()
    } else {
        blocks.is_idle() && buffer.is_empty()
    };
    if !idle {
        bail!("input ends inside a block ({} bytes left over)", buffer.len());
    }
    Ok(())
}

fn print_packet(out: &mut impl Write, packet: &ServerPacket, repr: Representation) -> anyhow::Result<()> {
    match packet {
        ServerPacket::Data { block, .. }
        | ServerPacket::Totals { block, .. }
        | ServerPacket::Extremes { block, .. } => print_block(out, block, repr),
        ServerPacket::TableColumns { message, block } => {
            info!(message = ?message, rows = block.rows(), "table columns");
            Ok(())
        }
        ServerPacket::Log { block } => {
            info!(rows = block.rows(), "server log block");
            Ok(())
        }
        ServerPacket::Progress(p) => {
            info!(rows = p.rows, bytes = p.bytes, total = p.total_rows, "progress");
            Ok(())
        }
        ServerPacket::ProfileInfo(p) => {
            info!(rows = p.rows, blocks = p.blocks, "profile info");
            Ok(())
        }
        ServerPacket::EndOfStream => {
            info!("end of stream");
            Ok(())
        }
    }
}

fn print_block(out: &mut impl Write, block: &Block, repr: Representation) -> anyhow::Result<()> {
    let names: Vec<String> = block.descriptors().map(|d| d.name().to_string()).collect();
    for row in block.to_rows(repr)? {
        let mut object = Map::new();
        for (name, value) in names.iter().zip(row) {
            object.insert(name.clone(), value.to_json());
        }
        writeln!(out, "{}", JsonValue::Object(object))?;
    }
    Ok(())
}
