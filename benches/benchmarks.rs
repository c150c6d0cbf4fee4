//! Benchmarks tests for measuring the performance of the code

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cmakeforge::{
    domain::{
        project_folder::ProjectFolder,
        target::{Define, LinkLib, SourceGroup, Target, TargetKind},
    },
    generator,
};

/// A project of `count` static libraries, each one depending on the previous
/// ones, and an executable linking all of them
fn synthetic_project(count: usize) -> ProjectFolder {
    let root = if cfg!(target_os = "windows") { "C:/ws/build/bench" } else { "/ws/build/bench" };
    let workspace = if cfg!(target_os = "windows") { "C:/ws" } else { "/ws" };

    let mut targets = Vec::with_capacity(count + 1);
    for i in 0..count {
        let mut lib = Target::new(format!("lib{i}"), TargetKind::StaticLib);
        lib.source_groups.push(SourceGroup::new(
            format!("{workspace}/src/lib{i}"),
            (0..20).map(|f| format!("file{f}.cpp")).collect::<Vec<_>>(),
        ));
        lib.include_dirs = (0..=i).map(|d| format!("{workspace}/src/lib{d}")).collect();
        lib.defines.push(Define::new(format!("LIB{i}_STATIC"), "1"));
        targets.push(lib);
    }

    let mut app = Target::new("app", TargetKind::Executable);
    app.source_groups.push(SourceGroup::new(
        format!("{workspace}/src/app"),
        vec!["main.cpp".to_string()],
    ));
    app.link_libs = (0..count).map(|i| LinkLib::Library(format!("lib{i}"))).collect();
    app.copy_dlls.push(format!("{workspace}/third_party/zlib.dll"));
    targets.push(app);

    let mut folder = ProjectFolder::new(Path::new(root), Path::new(workspace), "bench", targets)
        .expect("The synthetic project folder must be valid");
    folder.bootstrap = true;
    folder
}

pub fn generate_project_benchmark(c: &mut Criterion) {
    let small = synthetic_project(10);
    let large = synthetic_project(200);

    c.bench_function("Generate CMakeLists.txt - 10 targets", |b| {
        b.iter(|| generator::generate(black_box(&small)))
    });

    c.bench_function("Generate CMakeLists.txt - 200 targets", |b| {
        b.iter(|| generator::generate(black_box(&large)))
    });
}

criterion_group!(benches, generate_project_benchmark);
criterion_main!(benches);
