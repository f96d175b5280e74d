use bstr::BString;
use criterion::{criterion_group, criterion_main, Criterion};
use git_hash::ObjectId;
use git_object::{
    check, Blob, Commit, FileMode, Object, ObjectType, ShaFile, Signature, Tag, Timezone, Tree,
};

fn make_signature(identity: &str, ts: i64) -> Signature {
    Signature::new(identity, ts, Timezone::from_offset(3600))
}

fn sample_commit_bytes() -> Vec<u8> {
    let commit = Commit {
        tree: Some(ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap()),
        parents: vec![
            ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap(),
        ],
        author: Some(make_signature("Alice Author <alice@example.com>", 1700000000)),
        committer: Some(make_signature("Bob Committer <bob@example.com>", 1700000100)),
        encoding: None,
        extra: vec![],
        message: BString::from("Implement feature X\n\nThis commit adds the feature X with full test coverage.\n"),
    };
    commit.serialize_content()
}

fn sample_tree_bytes() -> Vec<u8> {
    let oid1 = ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
    let oid2 = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();

    let mut tree = Tree::new();
    tree.insert("Cargo.toml", FileMode::Regular, oid1);
    tree.insert("README.md", FileMode::Regular, oid2);
    tree.insert("build.sh", FileMode::Executable, oid1);
    tree.insert("src", FileMode::Tree, oid2);
    tree.insert("tests", FileMode::Tree, oid1);
    tree.serialize_content()
}

fn sample_tag_bytes() -> Vec<u8> {
    let tag = Tag {
        target: Some(ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap()),
        target_type: Some(ObjectType::Commit),
        tag_name: Some(BString::from("v1.0.0")),
        tagger: Some(make_signature("Release Bot <release@example.com>", 1700000000)),
        message: BString::from("Release version 1.0.0\n"),
    };
    tag.serialize_content()
}

fn parse_benchmarks(c: &mut Criterion) {
    let commit_data = sample_commit_bytes();
    let tree_data = sample_tree_bytes();
    let tag_data = sample_tag_bytes();
    let blob_data = b"Hello, world! This is some sample blob content.\n".to_vec();

    c.bench_function("parse_commit", |b| {
        b.iter(|| Commit::parse(&commit_data).unwrap());
    });

    c.bench_function("parse_tree_5_entries", |b| {
        b.iter(|| Tree::parse(&tree_data).unwrap());
    });

    c.bench_function("parse_tag", |b| {
        b.iter(|| Tag::parse(&tag_data).unwrap());
    });

    c.bench_function("check_commit", |b| {
        b.iter(|| check(ObjectType::Commit, &commit_data).unwrap());
    });

    c.bench_function("check_tree_5_entries", |b| {
        b.iter(|| check(ObjectType::Tree, &tree_data).unwrap());
    });

    c.bench_function("serialize_commit", |b| {
        let commit = Commit::parse(&commit_data).unwrap();
        b.iter(|| commit.serialize_content());
    });

    c.bench_function("serialize_tree_5_entries", |b| {
        let tree = Tree::parse(&tree_data).unwrap();
        b.iter(|| tree.serialize_content());
    });

    c.bench_function("roundtrip_commit", |b| {
        let obj = Object::Commit(Commit::parse(&commit_data).unwrap());
        b.iter(|| {
            let bytes = obj.serialize();
            Object::parse(&bytes).unwrap()
        });
    });

    c.bench_function("shafile_id_blob_48b", |b| {
        b.iter(|| ShaFile::from(Blob::new(blob_data.clone())).id().unwrap());
    });
}

criterion_group!(benches, parse_benchmarks);
criterion_main!(benches);
