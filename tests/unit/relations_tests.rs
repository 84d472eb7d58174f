/*!
 * Tests for parent, child and similar name queries
 */

use chapterglot::glossary::{Glossary, NameEntry};

use crate::common::{checked, global, local, memory_store, seeded_glossary};

#[tokio::test]
async fn test_verifiedNames_shouldSkipUncheckedLocals() {
    let store = memory_store();
    let glossary = seeded_glossary(
        &store,
        &[local("张伟", "Zhang Wei"), checked("李娜", "Li Na")],
        &[global("青云宗", "Azure Cloud Sect")],
    )
    .await;

    let verified: Vec<&str> = glossary
        .verified_names()
        .iter()
        .map(|n| n.original.as_str())
        .collect();

    assert_eq!(verified, vec!["李娜", "青云宗"]);
}

#[tokio::test]
async fn test_parentNames_withVerifiedContainer_shouldReturnIt() {
    let store = memory_store();
    let glossary = seeded_glossary(&store, &[checked("张伟明", "Zhang Weiming"), local("张伟", "Zhang Wei")], &[]).await;
    let child = glossary.get_name("张伟").unwrap().clone();
    let parent = glossary.get_name("张伟明").unwrap().clone();

    assert!(glossary.is_child(&child));
    assert!(!glossary.is_parent(&child));
    assert_eq!(glossary.parent_names(&child).len(), 1);
    assert_eq!(glossary.parent_names(&child)[0].original, "张伟明");

    // 张伟 is not verified, so it does not count as a child of 张伟明
    assert!(!glossary.is_parent(&parent));
    assert!(glossary.child_names(&parent).is_empty());
}

#[tokio::test]
async fn test_childNamesUnsafe_shouldIgnoreVerification() {
    let store = memory_store();
    let glossary = seeded_glossary(
        &store,
        &[local("张伟明", "Zhang Weiming"), local("张伟", "Zhang Wei"), local("明", "Ming")],
        &[],
    )
    .await;
    let parent = glossary.get_name("张伟明").unwrap().clone();

    let children: Vec<&str> = glossary
        .child_names_unsafe(&parent)
        .iter()
        .map(|n| n.original.as_str())
        .collect();

    assert_eq!(children, vec!["张伟", "明"]);
}

#[tokio::test]
async fn test_sameOriginal_shouldNotBeItsOwnParent() {
    let store = memory_store();
    let glossary = seeded_glossary(&store, &[checked("张伟", "Zhang Wei")], &[]).await;
    let entry = NameEntry::local("张伟", "Zhang Wei");

    assert!(!glossary.is_child(&entry));
    assert!(!glossary.is_parent(&entry));
}

#[tokio::test]
async fn test_similarNames_shouldExcludeSelfAndUnverified() {
    let store = memory_store();
    let glossary = seeded_glossary(
        &store,
        &[checked("张伟", "Zhang Wei"), local("张力", "Zhang Li"), checked("李娜", "Li Na")],
        &[global("李伟", "Li Wei")],
    )
    .await;
    let entry = glossary.get_name("张伟").unwrap().clone();

    let similar: Vec<&str> = glossary
        .similar_names(&entry)
        .iter()
        .map(|n| n.original.as_str())
        .collect();

    assert_eq!(similar, vec!["李伟"]);
}

fn similar_originals<'a>(glossary: &'a Glossary, original: &str) -> Vec<&'a str> {
    let entry = glossary.get_name(original).unwrap();
    glossary
        .similar_names(entry)
        .iter()
        .map(|n| n.original.as_str())
        .collect()
}

#[tokio::test]
async fn test_similarNames_withBothVerified_shouldMatchEachOther() {
    let store = memory_store();
    let glossary = seeded_glossary(
        &store,
        &[checked("张伟", "Zhang Wei"), checked("张力", "Zhang Li")],
        &[],
    )
    .await;

    assert_eq!(similar_originals(&glossary, "张伟"), vec!["张力"]);
    assert_eq!(similar_originals(&glossary, "张力"), vec!["张伟"]);
}

#[tokio::test]
async fn test_similarNames_withUnequalLengths_shouldMatchInBothQueryDirections() {
    let store = memory_store();
    let glossary = seeded_glossary(
        &store,
        &[checked("欧阳明月", "Ouyang Mingyue")],
        &[global("明力", "Ming Li")],
    )
    .await;

    assert_eq!(similar_originals(&glossary, "欧阳明月"), vec!["明力"]);
    assert_eq!(similar_originals(&glossary, "明力"), vec!["欧阳明月"]);
}
