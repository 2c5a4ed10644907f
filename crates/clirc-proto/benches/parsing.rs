//! Benchmarks for stream parsing and CTCP coding.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use clirc_proto::ctcp::{self, Segment};
use clirc_proto::{Machine, Step};

/// Simple PING message
const SIMPLE_MESSAGE: &[u8] = b"PING :irc.example.com\r\n";

/// Message with prefix
const PREFIX_MESSAGE: &[u8] = b":nick!user@host PRIVMSG #channel :Hello, world!\r\n";

/// Message with IRCv3 tags
const TAGGED_MESSAGE: &[u8] =
    b"@time=123;msgid=abc123;example.com/tag=value :nick!user@host PRIVMSG #channel :Hello with tags!\r\n";

fn drain(machine: &mut Machine) -> usize {
    let mut count = 0;
    while let Step::Message(msg) = machine.step() {
        black_box(msg);
        count += 1;
    }
    count
}

fn benchmark_stream_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stream Parsing");

    for (name, input) in [
        ("simple_ping", SIMPLE_MESSAGE),
        ("with_prefix", PREFIX_MESSAGE),
        ("with_tags", TAGGED_MESSAGE),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut machine = Machine::new();
                machine.feed(black_box(input));
                drain(&mut machine)
            })
        });
    }

    // a batch of 100 messages through one machine
    let batch: Vec<u8> = PREFIX_MESSAGE.repeat(100);
    group.bench_function("batch_100", |b| {
        b.iter(|| {
            let mut machine = Machine::new();
            machine.feed(black_box(&batch));
            drain(&mut machine)
        })
    });

    group.finish();
}

fn benchmark_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Serialization");

    let mut machine = Machine::new();
    machine.feed(TAGGED_MESSAGE);
    let msg = match machine.step() {
        Step::Message(msg) => msg,
        other => panic!("bench input failed to parse: {other:?}"),
    };

    group.bench_function("tagged_message", |b| {
        b.iter(|| black_box(&msg).to_bytes())
    });

    group.finish();
}

fn benchmark_ctcp(c: &mut Criterion) {
    let mut group = c.benchmark_group("CTCP");

    let segments = [
        Segment::Plain(Bytes::from_static(b"Say hi to Ron\n\t/actor")),
        Segment::Ctcp(Bytes::from_static(b"USERINFO")),
    ];
    let wire = ctcp::encode_all(&segments).unwrap();

    group.bench_function("encode", |b| {
        b.iter(|| ctcp::encode_all(black_box(&segments)).unwrap())
    });

    group.bench_function("decode", |b| b.iter(|| ctcp::decode(black_box(&wire))));

    group.finish();
}

criterion_group!(
    benches,
    benchmark_stream_parsing,
    benchmark_serialization,
    benchmark_ctcp,
);

criterion_main!(benches);
