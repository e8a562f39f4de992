// UTF-8 safety tests: Mixed content
//
// ASCII, emoji, multi-byte text and HTML tables in one document.

use crate::common::{assert_contiguous, lcg_text, split_text};

#[test]
fn test_mixed_scripts_and_emoji() {
    let text = "Check the valve ✅. Überprüfen! 检查阀门。 🚀 Fuel pressure? ".repeat(40);
    let segments = split_text(&[&text], 90, 15, 10);
    assert_contiguous(&segments, &text);
}

#[test]
fn test_mixed_with_table_markup() {
    let rows = "<tr><td>Ventil 🔧</td><td>日本</td></tr>".repeat(25);
    let text = format!(
        "{}<table>{rows}</table>{}",
        "Vorwort über die Prüfung. ".repeat(30),
        " Nachwort ✅.".repeat(30)
    );

    let segments = split_text(&[&text], 400, 40, 40);
    assert_contiguous(&segments, &text);
}

#[test]
fn test_generated_prose_with_multibyte_pages() {
    for seed in 0..10 {
        let pages = [
            lcg_text(seed, 120),
            "ß".repeat(37),
            String::new(),
            lcg_text(seed + 100, 120).replace('a', "ä"),
        ];
        let refs: Vec<&str> = pages.iter().map(String::as_str).collect();
        let text = pages.concat();

        let segments = split_text(&refs, 100, 10, 10);
        assert_contiguous(&segments, &text);
    }
}
