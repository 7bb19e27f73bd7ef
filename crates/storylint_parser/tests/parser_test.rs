use std::path::Path;
use storylint_core::MarkerConfig;
use storylint_parser::parse_chapter;

/// Chapter with `n` scenes; scene `k` has `k + 1` paragraphs of two lines.
fn synthetic_chapter(n: usize) -> String {
    let mut text = String::from("# Synthetic\n\nFront matter.\n");
    for k in 0..n {
        text.push_str(&format!(
            "<!-- SCENE-START id:scn-{k:02} characters:[\"c{k}\"] -->\n"
        ));
        for p in 0..=k {
            text.push_str(&format!("\nscene {k} paragraph {p} a\nscene {k} paragraph {p} b\n"));
        }
        text.push_str("\n<!-- SCENE-END -->\n\nInterstitial.\n");
    }
    text
}

#[test]
fn yields_one_scene_per_marker_pair_in_order() {
    for n in [0, 1, 4, 9] {
        let chapter = parse_chapter(
            "ch01",
            Path::new("ch01/content.md"),
            &synthetic_chapter(n),
            &MarkerConfig::default(),
        )
        .unwrap();
        assert_eq!(chapter.scenes().len(), n);

        let mut previous_end = 0;
        for (k, scene) in chapter.scenes().iter().enumerate() {
            assert_eq!(scene.id(), format!("scn-{k:02}"));
            assert!(scene.start_line() <= scene.end_line());
            assert!(*scene.meta_start_line() > previous_end);
            previous_end = *scene.end_line();
        }
    }
}

#[test]
fn paragraphs_are_ordered_disjoint_and_preserve_content() {
    let text = synthetic_chapter(5);
    let lines: Vec<&str> = text.lines().collect();
    let chapter = parse_chapter("ch01", Path::new("ch01/content.md"), &text, &MarkerConfig::default())
        .unwrap();

    for scene in chapter.scenes() {
        let paragraphs = scene.paragraphs();
        for (i, paragraph) in paragraphs.iter().enumerate() {
            assert_eq!(*paragraph.index(), i + 1);
            assert!(paragraph.start_line() <= paragraph.end_line());
            if i > 0 {
                assert!(paragraph.start_line() > paragraphs[i - 1].end_line());
            }
            let source = lines[paragraph.start_line() - 1..*paragraph.end_line()].join("\n");
            assert_eq!(paragraph.text(), source.trim());
        }

        let joined: Vec<&str> = paragraphs.iter().map(|p| p.text().as_str()).collect();
        let non_blank: Vec<&str> = scene
            .body_text()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .collect();
        assert_eq!(joined.join("\n"), non_blank.join("\n"));
    }
}
