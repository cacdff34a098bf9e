//! Feed a newline-delimited JSON log in small slices, the way it would
//! arrive from a socket, and print each record the moment its bytes are
//! complete.
#![allow(missing_docs)]

use jsondrip::{DefaultStreamParser, StreamMode};

const FEED: &str = concat!(
    "{\"event\":\"start\",\"job\":\"ingest\",\"id\":1}\n",
    "{\"event\":\"tick\",\"id\":2,\"progress\":0.5}\n",
    "{\"event\":\"warn\",\"id\":3,\"detail\":\"retrying \\\"shard-7\\\"\"}\n",
    "{\"event\":\"done\",\"id\":4,\"elapsed\":12.25}\n",
);

fn main() {
    let mut parser = DefaultStreamParser::new(StreamMode::ValueStream);
    for chunk in FEED.as_bytes().chunks(7) {
        for value in parser.absorb(chunk).expect("feed is valid ndjson") {
            println!("record: {value}");
        }
    }
    for value in parser.finish().expect("feed is valid ndjson") {
        println!("record: {value}");
    }
}
