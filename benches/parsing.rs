//! Performance benchmarks for fencemark
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Sample Markdown documents of various sizes
mod samples {
    pub const TINY: &str = "::: note\nHello, world!\n:::";

    pub const SMALL: &str = r#"# Heading

::: warning
This is a paragraph inside a container.
:::

- Item 1
- Item 2
- Item 3
"#;

    pub const MEDIUM: &str = r#"# Project README

This is a sample README file with fenced containers.

::: {.note #intro data-kind="readme"}
## Features

- Fast block parsing
- Fenced containers
- Attribute lists
:::

### Code Example

```rust
fn main() {
    println!("Hello, world!");
}
```

:::: tip
> This is a blockquote inside a container.

::: inner :::
Nested content.
:::
::::

## Conclusion

Thank you for reading!
"#;

    /// Generate a large document by repeating sections
    pub fn large() -> String {
        let section = r#"
## Section Title

This paragraph contains plain text spread over
a couple of lines.

::: {.callout .info #section}
- First bullet point
- Second bullet point

> A blockquote that spans
> multiple lines.
:::

```rust
fn example() {
    let x = 42;
    println!("{}", x);
}
```

"#;
        section.repeat(50)
    }

    /// Containers nested `depth` deep, each with a longer fence than the last
    pub fn nested_containers(depth: usize) -> String {
        let mut doc = String::new();
        for level in (0..depth).rev() {
            doc.push_str(&":".repeat(3 + level));
            doc.push_str(" box\n");
        }
        doc.push_str("core\n");
        for level in 0..depth {
            doc.push_str(&":".repeat(3 + level));
            doc.push('\n');
        }
        doc
    }

    /// Many opening fences that never close
    pub fn unclosed_fences() -> String {
        "::: open\ntext\n".repeat(500)
    }

    /// Lines that look like fences but carry invalid parameters
    pub fn rejected_fences() -> String {
        "::: {.a x=\"1\" not valid\n".repeat(1000)
    }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for (name, input) in [
        ("tiny", samples::TINY),
        ("small", samples::SMALL),
        ("medium", samples::MEDIUM),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_function(name, |b| b.iter(|| fencemark::to_html(black_box(input))));
    }

    let large = samples::large();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large", |b| {
        b.iter(|| fencemark::to_html(black_box(&large)))
    });

    group.finish();
}

fn bench_containers(c: &mut Criterion) {
    let mut group = c.benchmark_group("containers");

    let large = samples::large();
    let plain = fencemark::Options {
        containers: false,
        ..fencemark::Options::default()
    };
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large_disabled", |b| {
        b.iter(|| fencemark::to_html_with_options(black_box(&large), &plain))
    });

    for depth in [4, 16, 30] {
        let input = samples::nested_containers(depth);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("nested", depth), &input, |b, input| {
            b.iter(|| fencemark::to_html(black_box(input)))
        });
    }

    group.bench_function("attribute_list", |b| {
        b.iter(|| fencemark::container::validate(black_box(" {.a .b #id key=\"some value\"} :::"), ':'))
    });

    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");
    group.sample_size(20); // Fewer samples for slow cases

    let unclosed = samples::unclosed_fences();
    group.throughput(Throughput::Bytes(unclosed.len() as u64));
    group.bench_function("unclosed_fences", |b| {
        b.iter(|| fencemark::to_html(black_box(&unclosed)))
    });

    let rejected = samples::rejected_fences();
    group.throughput(Throughput::Bytes(rejected.len() as u64));
    group.bench_function("rejected_fences", |b| {
        b.iter(|| fencemark::to_html(black_box(&rejected)))
    });

    let nested = "> ".repeat(100) + "deep\n";
    group.throughput(Throughput::Bytes(nested.len() as u64));
    group.bench_function("deep_blockquotes", |b| {
        b.iter(|| fencemark::to_html(black_box(&nested)))
    });

    group.finish();
}

fn bench_buffer_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_reuse");

    let input = samples::MEDIUM;
    group.throughput(Throughput::Bytes(input.len() as u64));

    // Without buffer reuse
    group.bench_function("without_reuse", |b| {
        b.iter(|| fencemark::to_html(black_box(input)))
    });

    // With buffer reuse
    group.bench_function("with_reuse", |b| {
        let mut buffer = Vec::with_capacity(input.len() * 2);
        b.iter(|| {
            fencemark::to_html_into(black_box(input), &mut buffer);
            black_box(&buffer);
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing,
    bench_containers,
    bench_pathological,
    bench_buffer_reuse
);
criterion_main!(benches);
