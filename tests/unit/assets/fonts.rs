use super::*;
use crate::test_support::{install_font, system_font};

fn config(dir: &Path, primary: FontFamilySpec, fallback: FontFamilySpec) -> FontConfig {
    FontConfig {
        search_dirs: vec![dir.to_path_buf()],
        primary,
        fallback,
    }
}

#[test]
fn role_sizes_are_fixed() {
    let sizes: Vec<f32> = FontRole::ALL.iter().map(|r| r.size_px()).collect();
    assert_eq!(sizes, vec![75.0, 38.0, 28.0, 60.0, 34.0, 24.0, 90.0]);
}

#[test]
fn builtin_families_name_their_files() {
    let p = FontFamilySpec::pretendard();
    assert_eq!(p.file(FontRole::TitleMain), "Pretendard-Bold.ttf");
    assert_eq!(p.file(FontRole::Body), "Pretendard-Medium.ttf");
    assert_eq!(p.file(FontRole::Page), "Pretendard-Regular.ttf");
    assert_eq!(p.file(FontRole::Logo), "Pretendard-ExtraBold.ttf");

    let m = FontFamilySpec::malgun();
    assert_eq!(m.file(FontRole::Headline), "malgunbd.ttf");
    assert_eq!(m.file(FontRole::TitleSub), "malgun.ttf");
}

#[test]
fn missing_both_families_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config(
        tmp.path(),
        FontFamilySpec::pretendard(),
        FontFamilySpec::malgun(),
    );
    let err = FontSet::load(&cfg).unwrap_err();
    assert!(matches!(err, CardError::Font(_)), "{err}");
    assert!(err.to_string().contains("Pretendard"));
}

#[test]
fn garbage_file_is_not_a_font() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("bad.ttf"), b"not a font").unwrap();
    let cfg = config(
        tmp.path(),
        FontFamilySpec::uniform("Bad", "bad.ttf"),
        FontFamilySpec::uniform("Bad", "bad.ttf"),
    );
    assert!(FontSet::load(&cfg).is_err());
}

#[test]
fn primary_family_loads_without_fallback() {
    let tmp = tempfile::tempdir().unwrap();
    if install_font(tmp.path(), "primary.ttf").is_none() {
        return;
    }
    let cfg = config(
        tmp.path(),
        FontFamilySpec::uniform("Primary", "primary.ttf"),
        FontFamilySpec::uniform("Fallback", "missing.ttf"),
    );
    let set = FontSet::load(&cfg).unwrap();
    assert_eq!(set.family(), "Primary");
    assert!(!set.used_fallback());
    assert_eq!(set.faces().count(), FontRole::ALL.len());
    for role in FontRole::ALL {
        assert_eq!(set.get(role).role(), role);
        assert_eq!(set.get(role).size_px(), role.size_px());
    }
}

#[test]
fn one_missing_primary_file_switches_every_role() {
    let tmp = tempfile::tempdir().unwrap();
    if install_font(tmp.path(), "primary.ttf").is_none() {
        return;
    }
    install_font(tmp.path(), "fallback.ttf").unwrap();

    // Only the logo file is absent from the primary family.
    let primary = FontFamilySpec::new(
        "Primary",
        FontRole::ALL.map(|r| match r {
            FontRole::Logo => "absent.ttf".to_owned(),
            _ => "primary.ttf".to_owned(),
        }),
    );
    let cfg = config(
        tmp.path(),
        primary,
        FontFamilySpec::uniform("Fallback", "fallback.ttf"),
    );
    let set = FontSet::load(&cfg).unwrap();
    assert!(set.used_fallback());
    assert_eq!(set.family(), "Fallback");
    assert!(set.fallback_reason().unwrap().contains("absent.ttf"));
    for face in set.faces() {
        assert_eq!(face.path(), tmp.path().join("fallback.ttf"));
    }
}

#[test]
fn search_dirs_are_tried_in_order() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    if install_font(b.path(), "f.ttf").is_none() {
        return;
    }
    let cfg = FontConfig {
        search_dirs: vec![a.path().to_path_buf(), b.path().to_path_buf()],
        primary: FontFamilySpec::uniform("F", "f.ttf"),
        fallback: FontFamilySpec::uniform("F", "f.ttf"),
    };
    let set = FontSet::load(&cfg).unwrap();
    assert_eq!(set.get(FontRole::Body).path(), b.path().join("f.ttf"));

    install_font(a.path(), "f.ttf").unwrap();
    let set = FontSet::load(&cfg).unwrap();
    assert_eq!(set.get(FontRole::Body).path(), a.path().join("f.ttf"));
}

#[test]
fn glyph_height_scales_with_role_size() {
    let Some(path) = system_font() else {
        return;
    };
    let bytes = std::fs::read(path).unwrap();
    let (small, weight) = face_metrics(&bytes, FontRole::Page.size_px()).unwrap();
    let (large, _) = face_metrics(&bytes, FontRole::Logo.size_px()).unwrap();
    assert!(small > 0.0);
    assert!(large > small);
    assert_eq!(small, small.round());
    assert!(weight >= 100);
}

#[test]
fn leading_dirs_take_priority() {
    let cfg = FontConfig::default().with_leading_dirs([PathBuf::from("custom")]);
    assert_eq!(cfg.search_dirs.first(), Some(&PathBuf::from("custom")));
    assert!(cfg.search_dirs.contains(&PathBuf::from("fonts")));
}
