//! Benchmarks for name decoding and rename planning
//!
//! - Source state reading (directory walk + name decoding)
//! - Attribute parsing and encoding for single names
//! - Rename planning over a whole source tree

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mirra_core::path::AbsPath;
use mirra_engine::attr::Attributes;
use mirra_engine::entry::EntryKind;
use mirra_engine::modifier::ModifierSet;
use mirra_engine::plan::RenamePlan;
use mirra_engine::state::SourceState;
use tempfile::TempDir;

/// Create a source tree with N files spread over a few directories
fn create_test_repo(num_files: usize) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let dirs = ["dot_config", "private_dot_ssh", "dot_local/bin"];
    for dir in dirs {
        std::fs::create_dir_all(temp.path().join(dir)).expect("Failed to create directory");
    }

    for i in 0..num_files {
        let filename = match i % 4 {
            0 => format!("dot_config/file_{i}.toml"),
            1 => format!("private_dot_ssh/private_key_{i}"),
            2 => format!("dot_local/bin/executable_script_{i}"),
            3 => format!("dot_profile_{i}.tmpl"),
            _ => unreachable!(),
        };

        std::fs::write(temp.path().join(&filename), format!("content {i}\n"))
            .unwrap_or_else(|_| panic!("Failed to write file: {filename}"));
    }

    temp
}

fn root_of(temp: &TempDir) -> AbsPath {
    AbsPath::new(temp.path().to_path_buf()).expect("Failed to create AbsPath")
}

/// Benchmark source state reading
fn bench_source_state_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("source_state_read");

    for size in &[10, 50, 100, 500] {
        let temp = create_test_repo(*size);
        let root = root_of(&temp);

        group.bench_with_input(BenchmarkId::from_parameter(size), &root, |b, root| {
            b.iter(|| {
                let state = SourceState::read(black_box(root.clone())).expect("read failed");
                black_box(state.len())
            });
        });
    }

    group.finish();
}

/// Benchmark attribute parsing and encoding
fn bench_attribute_codec(c: &mut Criterion) {
    let test_cases = [
        ("dot_bashrc", EntryKind::File),
        ("private_dot_ssh", EntryKind::Directory),
        ("private_executable_deploy.sh", EntryKind::File),
        ("dot_gitconfig.tmpl", EntryKind::File),
        ("symlink_dot_vimrc", EntryKind::Symlink),
        ("literal_private_key", EntryKind::File),
        ("config.tmpl.literal", EntryKind::File),
        ("README.md", EntryKind::File),
    ];

    c.bench_function("attribute_parsing", |b| {
        b.iter(|| {
            for (name, kind) in &test_cases {
                let _ = black_box(Attributes::parse_from_source(black_box(name), *kind));
            }
        });
    });

    let attrs = Attributes::PRIVATE | Attributes::EXECUTABLE | Attributes::TEMPLATE;
    c.bench_function("attribute_encoding", |b| {
        b.iter(|| black_box(attrs.encode_source_name(black_box(".profile"), EntryKind::File)));
    });
}

/// Benchmark planning a rename of every entry
fn bench_rename_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("rename_planning");
    let modifiers = ModifierSet::parse("+private,-template").expect("parse failed");

    for size in &[10, 100, 500] {
        let temp = create_test_repo(*size);
        let state = SourceState::read(root_of(&temp)).expect("read failed");

        group.bench_with_input(BenchmarkId::from_parameter(size), &state, |b, state| {
            b.iter(|| {
                let plan = RenamePlan::build(state.entries(), &modifiers, state.root())
                    .expect("plan failed");
                black_box(plan.len())
            });
        });
    }

    group.finish();
}

// Allow missing docs for criterion-generated code
#[allow(missing_docs)]
#[allow(clippy::wildcard_imports)]
mod bench_groups {
    use super::*;

    criterion_group!(
        benches,
        bench_source_state_read,
        bench_attribute_codec,
        bench_rename_planning,
    );
}

criterion_main!(bench_groups::benches);
