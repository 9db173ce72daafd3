//! Benchmark for log parsing and tail operations
//! Run: cargo bench -p logtap-core --bench parsing

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logtap_core::parser::{
    ApacheParser, AutoParser, JsonParser, LogParser, NginxParser, Parser, SyslogParser,
};
use logtap_core::{detect_format, filter_lines, TailReader};
use std::hint::black_box;
use std::io::Write;

// Sample log lines for benchmarking
const APACHE_LOG: &str = r#"[Tue Feb 10 14:30:45.123 2026] [core:error] [pid 42:tid 7] [client 192.168.1.100:5050] Failed to connect to database: connection refused"#;
const NGINX_LOG: &str = r#"192.168.1.50 - alice [10/Feb/2026:14:30:45 +0000] "GET /api/users/123 HTTP/1.1" 500 1234 "-" "Mozilla/5.0""#;
const SYSLOG_LOG: &str = r#"Feb 10 14:30:45 server-01 sshd[12345]: Failed password for invalid user admin from 10.0.0.1 port 22"#;
const JSON_LOG: &str = r#"{"timestamp": "2026-02-10T14:30:45Z", "level": "error", "service": "payments", "msg": "charge declined", "user_id": "u999", "amount": 99.99}"#;

fn bench_single_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_line");

    group.bench_function("apache", |b| {
        let parser = ApacheParser::new();
        b.iter(|| parser.parse(black_box(APACHE_LOG)))
    });
    group.bench_function("nginx", |b| {
        let parser = NginxParser::new();
        b.iter(|| parser.parse(black_box(NGINX_LOG)))
    });
    group.bench_function("syslog", |b| {
        let parser = SyslogParser::new();
        b.iter(|| parser.parse(black_box(SYSLOG_LOG)))
    });
    group.bench_function("json", |b| {
        let parser = JsonParser::new();
        b.iter(|| parser.parse(black_box(JSON_LOG)))
    });

    group.finish();
}

fn bench_auto_dispatch(c: &mut Criterion) {
    let parser = Parser::Auto(AutoParser::new());

    let mut group = c.benchmark_group("auto_dispatch");
    for (name, line) in [
        ("json", JSON_LOG),
        ("syslog", SYSLOG_LOG),
        ("nginx", NGINX_LOG),
        ("apache", APACHE_LOG),
    ] {
        group.bench_function(name, |b| b.iter(|| parser.parse(black_box(line))));
    }
    group.finish();
}

fn bench_batch_parsing(c: &mut Criterion) {
    let parser = NginxParser::new();
    let batch_sizes = [10, 100, 1000, 10000];

    let mut group = c.benchmark_group("batch_parsing");
    for size in batch_sizes {
        let logs: Vec<String> = (0..size)
            .map(|i| format!(
                r#"192.168.1.{} - user{} [10/Feb/2026:14:30:45 +0000] "GET /api/test/{} HTTP/1.1" 200 1234 "-" "Mozilla/5.0""#,
                i % 255, i, i
            ))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("nginx", size), &logs, |b, logs| {
            b.iter(|| parser.parse_many(logs))
        });
        group.bench_with_input(BenchmarkId::new("detect", size), &logs, |b, logs| {
            b.iter(|| detect_format(&logs[..logs.len().min(10)]))
        });
    }
    group.finish();
}

fn bench_tail(c: &mut Criterion) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..200_000 {
        writeln!(file, "{SYSLOG_LOG} seq={i}").unwrap();
    }
    file.flush().unwrap();
    let path = file.path().to_path_buf();

    let mut group = c.benchmark_group("tail");
    for limit in [10, 1000] {
        group.bench_with_input(BenchmarkId::new("default_chunks", limit), &limit, |b, &limit| {
            let reader = TailReader::new();
            b.iter(|| reader.tail(&path, limit).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("4k_chunks", limit), &limit, |b, &limit| {
            let reader = TailReader::with_chunk_size(4096);
            b.iter(|| reader.tail(&path, limit).unwrap())
        });
    }

    let lines = TailReader::new().tail(&path, 1000).unwrap();
    group.bench_function("filter_substring_1000", |b| {
        b.iter(|| filter_lines(black_box(lines.clone()), Some("seq=19"), None, true))
    });
    group.bench_function("filter_regex_1000", |b| {
        b.iter(|| filter_lines(black_box(lines.clone()), None, Some(r"seq=19\d{3}$"), false))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_single_line,
    bench_auto_dispatch,
    bench_batch_parsing,
    bench_tail,
);

criterion_main!(benches);
