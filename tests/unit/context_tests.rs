/*!
 * Tests for content-log context search and review packets
 */

use chapterglot::glossary::NameEntry;

use crate::common::{checked, global, local, memory_store, seed_contents, seeded_glossary};

const LOG: [&str; 2] = [
    "张伟明走了进来。\n张伟笑了。",
    "张伟明和张伟是兄弟，他们一起修炼了很多年。\n他叫张伟，是个好人。\n李娜走了。",
];

#[tokio::test]
async fn test_context_shouldRankLongestLinesFirst() {
    let store = memory_store();
    seed_contents(&store, &LOG).await;
    let glossary = seeded_glossary(&store, &[local("李娜", "Li Na"), local("张伟明", "Zhang Weiming")], &[]).await;
    let name = glossary.get_name("张伟明").unwrap().clone();

    let packet = glossary.context(&name, 80).await.unwrap();

    let texts: Vec<&str> = packet.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["张伟明和张伟是兄弟，他们一起修炼了很多年。", "张伟明走了进来。"]);
}

#[tokio::test]
async fn test_context_withShortfall_shouldFallBackToChildName() {
    let store = memory_store();
    seed_contents(&store, &LOG).await;
    let glossary = seeded_glossary(&store, &[local("张伟明", "Zhang Weiming"), local("张伟", "Zhang Wei")], &[]).await;
    let name = glossary.get_name("张伟明").unwrap().clone();

    let packet = glossary.context(&name, 80).await.unwrap();

    assert_eq!(packet.len(), 4);
    let indexes: Vec<usize> = packet.lines.iter().map(|l| l.index).collect();
    assert_eq!(indexes, vec![1, 2, 3, 4]);
    assert_eq!(packet.lines[2].text, "他叫张伟，是个好人。");
    assert_eq!(packet.lines[2].matched, "张伟");
    assert_eq!(packet.lines[3].text, "张伟笑了。");
    // lines mentioning the parent are never repeated for the child
    assert!(!packet.lines[2..].iter().any(|l| l.text.contains("张伟明")));
}

#[tokio::test]
async fn test_context_shouldStopAtQuota() {
    let store = memory_store();
    seed_contents(&store, &LOG).await;
    let glossary = seeded_glossary(&store, &[local("张伟明", "Zhang Weiming"), local("张伟", "Zhang Wei")], &[]).await;
    let name = glossary.get_name("张伟明").unwrap().clone();

    let packet = glossary.context(&name, 3).await.unwrap();

    assert_eq!(packet.len(), 3);
    assert_eq!(packet.lines[2].text, "他叫张伟，是个好人。");
}

#[tokio::test]
async fn test_context_withEmptyLog_shouldBeEmpty() {
    let store = memory_store();
    let glossary = seeded_glossary(&store, &[local("张伟", "Zhang Wei")], &[]).await;

    let packet = glossary.context(&NameEntry::local("张伟", "Zhang Wei"), 80).await.unwrap();

    assert!(packet.is_empty());
    assert_eq!(packet.to_string(), "");
}

#[tokio::test]
async fn test_contextPacket_display_shouldNumberLines() {
    let store = memory_store();
    let glossary = seeded_glossary(&store, &[], &[]).await;
    let contents = vec!["李娜走了。".to_string(), "李娜说：再见。".to_string()];

    let packet = glossary.context_from_log(&contents, &NameEntry::local("李娜", "Li Na"), 80);

    assert_eq!(packet.to_string(), "Context 1: 李娜说：再见。\nContext 2: 李娜走了。");
}

#[tokio::test]
async fn test_reviewPacket_withoutTemplate_shouldListRelatedNamesOnce() {
    let store = memory_store();
    let glossary = seeded_glossary(
        &store,
        &[checked("张伟明", "Zhang Weiming"), local("张伟", "Zhang Wei")],
        &[global("李伟", "Li Wei")],
    )
    .await;
    let name = glossary.get_name("张伟").unwrap().clone();

    let packet = glossary.review_packet(&name, 80).await.unwrap();

    assert_eq!(
        packet,
        "张伟\n\nParent names:\n张伟明: Zhang Weiming\n\nSimilar names:\n李伟: Li Wei"
    );
}

#[tokio::test]
async fn test_reviewPacket_withTemplate_shouldFillDataAndContext() {
    let store = memory_store();
    seed_contents(&store, &["张伟笑了。"]).await;
    let mut glossary = seeded_glossary(&store, &[local("张伟", "Zhang Wei")], &[global("李伟", "Li Wei")]).await;
    glossary.set_copy_message("Check:\n{DATA}\n---\n{CONTEXT}").await.unwrap();
    let name = glossary.get_name("张伟").unwrap().clone();

    let packet = glossary.review_packet(&name, 80).await.unwrap();

    assert_eq!(
        packet,
        "Check:\n张伟\n\nSimilar names:\n李伟: Li Wei\n\n\n---\nContext 1: 张伟笑了。"
    );
}

#[tokio::test]
async fn test_reviewPacket_withNoRelations_shouldBeJustTheName() {
    let store = memory_store();
    let glossary = seeded_glossary(&store, &[local("李娜", "Li Na")], &[]).await;
    let name = glossary.get_name("李娜").unwrap().clone();

    assert_eq!(glossary.review_packet(&name, 80).await.unwrap(), "李娜");
}
