//! Build a message, inspect its framing, and read it back
//!
//! Shows the builder/reader pair working on a single frame without any
//! transport underneath.

use anyhow::Result;
use chrono::Utc;
use msgwire::{Header, InboundMessage, MessageType, OutboundMessage, HEADER_SIZE};
use tracing::info;
use uuid::Uuid;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    println!("Message Wire Protocol Demo");
    println!("==========================");

    // Build a Data message field by field
    let request_id = Uuid::new_v4();
    let issued_at = Utc::now();

    let mut message = OutboundMessage::new();
    message.write_uuid(request_id)?;
    message.write_datetime(issued_at)?;
    message.write_string("orders/refresh")?;
    message.write_i32(42)?;
    message.write_bool(true)?;

    let bytes = message.finish();
    info!(
        "Built {} byte frame with {} byte payload",
        bytes.len(),
        bytes.len() - HEADER_SIZE
    );

    // The first five bytes are the header
    let header = Header::decode(&bytes)?;
    println!("type tag      : {:?} ({})", header.message_type, header.message_type.tag());
    println!("payload length: {}", header.length);

    // Read the fields back in the order they were written
    let mut reader = InboundMessage::from_frame(bytes)?;
    println!("request id    : {}", reader.read_uuid()?);
    println!("issued at     : {}", reader.read_datetime()?);
    println!("command       : {}", reader.read_string()?);
    println!("count         : {}", reader.read_i32()?);
    println!("urgent        : {}", reader.read_bool()?);

    // Pre-encoded fragments take a single-allocation fast path
    let ping = OutboundMessage::from_fragments(MessageType::Ping, &[]);
    println!("empty ping    : {:?}", &ping[..]);

    println!("\nDemo completed successfully");
    Ok(())
}
