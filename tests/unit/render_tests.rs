/*!
 * Tests for chapter rendering and name colors
 */

use chapterglot::glossary::NameEntry;
use chapterglot::translation::render::{name_span, render_chapter};
use chapterglot::translation::NameColor;

use crate::common::{checked, global, local, memory_store, seeded_glossary};

#[tokio::test]
async fn test_forEntry_shouldFollowColorPriority() {
    let store = memory_store();
    let glossary = seeded_glossary(
        &store,
        &[
            checked("张伟", "Zhang Wei"),
            local("张伟明", "Zhang Weiming"),
            local("伟", "Wei"),
            local("李娜", "Li Na"),
        ],
        &[global("青云宗", "Azure Cloud Sect")],
    )
    .await;
    let color = |original: &str| NameColor::for_entry(&glossary, glossary.get_name(original).unwrap());

    assert_eq!(color("张伟"), NameColor::Checked);
    assert_eq!(color("青云宗"), NameColor::Global);
    assert_eq!(color("张伟明"), NameColor::Parent);
    assert_eq!(color("伟"), NameColor::Child);
    assert_eq!(color("李娜"), NameColor::Default);
}

#[test]
fn test_nameColor_display_shouldBeHex() {
    assert_eq!(NameColor::Global.to_string(), "#5c9c7c");
    assert_eq!(NameColor::Checked.hex(), "#5c7c9c");
}

#[tokio::test]
async fn test_renderChapter_shouldNeverNestSpans() {
    let store = memory_store();
    let glossary = seeded_glossary(
        &store,
        &[checked("张伟", "Zhang Wei"), local("张伟明", "Zhang Weiming"), local("伟", "Wei")],
        &[global("青云宗", "Azure Cloud Sect")],
    )
    .await;

    let html = render_chapter("Zhang Weiming met Zhang Wei at Azure Cloud Sect.\nWei <3", &glossary);

    let expected = format!(
        "{} met {} at {}.<br>{} &lt;3",
        name_span(glossary.get_name("张伟明").unwrap(), NameColor::Parent),
        name_span(glossary.get_name("张伟").unwrap(), NameColor::Checked),
        name_span(glossary.get_name("青云宗").unwrap(), NameColor::Global),
        name_span(glossary.get_name("伟").unwrap(), NameColor::Child),
    );
    assert_eq!(html, expected);
    assert_eq!(html.matches("<span").count(), 4);
}

#[tokio::test]
async fn test_renderChapter_withEmptyTranslation_shouldSkipName() {
    let store = memory_store();
    let glossary = seeded_glossary(&store, &[local("王五", "")], &[]).await;

    assert_eq!(render_chapter("a & b", &glossary), "a &amp; b");
}

#[test]
fn test_nameSpan_shouldCarryOriginal() {
    let span = name_span(&NameEntry::local("李娜", "Li Na"), NameColor::Default);

    assert!(span.contains(r#"data-original="李娜""#));
    assert!(span.contains("user-select: all;"));
    assert!(span.ends_with(">Li Na</span>"));
}
