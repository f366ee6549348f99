use propbinder::{
    BundleLayout, Error, ExportOptions, ImportOptions, Locale, ReadOptions, SpreadsheetFormat,
    UnknownLocalePolicy, export_bundles, export_to_spreadsheet, import_from_spreadsheet,
};
use std::fs;
use std::path::{Path, PathBuf};

fn write(root: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = root.join(name);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(&path, content).expect("write file");
    path
}

fn seed_tree(root: &Path) -> Vec<PathBuf> {
    vec![
        write(root, "app/messages.properties", b"title=Title\nlist=a\\\n  b\n"),
        write(root, "app/messages_de.properties", b"title=Titel\n"),
        write(root, "app/messages_de_AT.properties", b"title=Titel (AT)\n"),
        write(root, "lib/messages_fr.properties", b"title=Titre\n"),
        write(root, "README.md", b"# not a bundle\n"),
    ]
}

#[test]
fn test_export_nested_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_tree(dir.path());
    let output = dir.path().join("i18n.csv");

    let summary = export_to_spreadsheet(dir.path(), &files, &output, &ExportOptions::new())
        .expect("export");
    assert_eq!(summary.bundles, 2);
    assert_eq!(summary.keys, 3);

    let csv = fs::read_to_string(&output).expect("read csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "bundle,key,default,de,de_AT,fr");
    assert_eq!(lines[1], "app/messages,title,Title,Titel,Titel (AT),");
    assert_eq!(lines[2], "app/messages,list,\"a,b\",,,");
    assert_eq!(lines[3], "lib/messages,title,,,,Titre");
}

#[test]
fn test_import_then_export_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("source");
    let target = dir.path().join("target");
    fs::create_dir_all(&target).expect("target dir");
    let files = seed_tree(&source);

    let first = dir.path().join("first.csv");
    export_to_spreadsheet(&source, &files, &first, &ExportOptions::new()).expect("export");

    let imported = import_from_spreadsheet(&first, &target, &ImportOptions::new()).expect("import");
    assert_eq!(imported.files.len(), 4);
    assert!(target.join("app/messages_de_AT.properties").exists());

    let second = dir.path().join("second.csv");
    export_to_spreadsheet(&target, &imported.files, &second, &ExportOptions::new())
        .expect("re-export");
    assert_eq!(
        fs::read_to_string(&first).expect("first"),
        fs::read_to_string(&second).expect("second")
    );
}

#[test]
fn test_locale_filter_excludes_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = seed_tree(dir.path());

    let bundles = export_bundles(
        dir.path(),
        &files,
        &ExportOptions::new().with_locale_filter("de"),
    )
    .expect("export");
    // The default locale always passes the filter.
    assert_eq!(bundles.len(), 1);
    let app = &bundles[0];
    assert_eq!(app.base_name(), "app/messages");
    assert_eq!(app.locales(), vec![&Locale::Default, &Locale::tag("de")]);
}

#[test]
fn test_inconsistent_bundle_aborts_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = vec![
        write(dir.path(), "app_de.properties", b"k=v\n"),
        write(dir.path(), "app_de.txt", b"k=w\n"),
    ];
    let layout = BundleLayout {
        file_pattern: r".*?(_\w{2})?\.(properties|txt)".to_string(),
        locale_groups: vec![1],
        ..BundleLayout::default()
    };
    let output = dir.path().join("i18n.csv");
    let result = export_to_spreadsheet(
        dir.path(),
        &files,
        &output,
        &ExportOptions::new().with_layout(layout),
    );
    assert!(matches!(result, Err(Error::InconsistentBundleBaseName { .. })));
    assert!(!output.exists());
}

#[test]
fn test_latin1_properties_and_tsv_spreadsheet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = vec![write(
        dir.path(),
        "labels_de.properties",
        b"greeting=Gr\xFC\xDFe\n",
    )];
    let output = dir.path().join("i18n.tsv");
    let options = ExportOptions::new()
        .with_properties(ReadOptions::new().with_encoding("ISO-8859-1"))
        .with_spreadsheet_format(SpreadsheetFormat::Tsv);

    export_to_spreadsheet(dir.path(), &files, &output, &options).expect("export");
    assert_eq!(
        fs::read_to_string(&output).expect("read tsv"),
        "bundle\tkey\tde\nlabels\tgreeting\tGrüße\n"
    );

    let target = dir.path().join("target");
    fs::create_dir(&target).expect("target dir");
    import_from_spreadsheet(
        &output,
        &target,
        &ImportOptions::new()
            .with_spreadsheet_format(SpreadsheetFormat::Tsv)
            .with_property_encoding("ISO-8859-1")
            .with_escaping(propbinder::EscapingMode::Native),
    )
    .expect("import");
    let bytes = fs::read(target.join("labels_de.properties")).expect("read property file");
    assert!(bytes.ends_with(b"greeting=Gr\xFC\xDFe\n"));
}

#[test]
fn test_import_rejects_unknown_locale_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write(
        dir.path(),
        "i18n.csv",
        b"bundle,key,de,fr\nlabels,greeting,Hallo,Bonjour\n",
    );
    let options = ImportOptions::new()
        .with_locale_filter("de")
        .with_unknown_locales(UnknownLocalePolicy::Reject);
    let error = import_from_spreadsheet(&input, dir.path(), &options).expect_err("reject");
    assert!(matches!(error.root_cause(), Error::UnknownLocale(label) if label == "fr"));
    assert!(!dir.path().join("labels_de.properties").exists());
}

#[test]
fn test_import_unknown_encoding_is_reported_before_reading() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = import_from_spreadsheet(
        &dir.path().join("missing.csv"),
        dir.path(),
        &ImportOptions::new().with_spreadsheet_encoding("klingon"),
    );
    assert!(matches!(result, Err(Error::UnknownEncoding(_))));
}

#[test]
fn test_empty_keys_do_not_break_the_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("source");
    let target = dir.path().join("target");
    fs::create_dir_all(&target).expect("target dir");
    let files = vec![write(
        &source,
        "labels_en.properties",
        b"=empty key value\n\\ =blank key value\ngreeting=Hello\n",
    )];

    let sheet = dir.path().join("i18n.csv");
    let summary = export_to_spreadsheet(&source, &files, &sheet, &ExportOptions::new())
        .expect("export");
    assert_eq!(summary.keys, 1);
    assert_eq!(
        fs::read_to_string(&sheet).expect("read csv"),
        "bundle,key,en\nlabels,greeting,Hello\n"
    );

    let imported = import_from_spreadsheet(&sheet, &target, &ImportOptions::new()).expect("import");
    assert_eq!(imported.translations, 1);
    assert_eq!(imported.files, vec![target.join("labels_en.properties")]);
}
