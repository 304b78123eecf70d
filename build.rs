use std::path::Path;

fn main() {
    let viewconf_path = Path::new("viewconfs/default.json");
    validate_viewconf_file(viewconf_path);
    set_build_dependencies();
}

fn validate_viewconf_file(viewconf_path: &Path) {
    // Ensure the default view configuration exists at build time
    assert!(
        viewconf_path.exists(),
        "\n\nVIEWCONF BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the default view configuration before building.\n",
        viewconf_path.display()
    );

    let contents = std::fs::read_to_string(viewconf_path).unwrap_or_else(|e| {
        panic!(
            "\n\nVIEWCONF BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            viewconf_path.display()
        );
    });

    let viewconf: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\nVIEWCONF BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            viewconf_path.display()
        );
    });

    validate_viewconf_structure(&viewconf);
}

fn validate_viewconf_structure(viewconf: &serde_json::Value) {
    assert!(
        viewconf.is_object(),
        "\n\nVIEWCONF BUILD ERROR: Root must be a JSON object\n\
         Got: {viewconf}\n"
    );

    let views = viewconf
        .get("views")
        .and_then(|v| v.as_array())
        .unwrap_or_else(|| {
            panic!(
                "\n\nVIEWCONF BUILD ERROR: Missing 'views' array\n\
                 The view configuration must have a top-level 'views' array.\n"
            );
        });

    assert!(
        !views.is_empty(),
        "\n\nVIEWCONF BUILD ERROR: 'views' must contain at least one view\n"
    );

    let mut total_tracks = 0;
    for (i, view) in views.iter().enumerate() {
        total_tracks += validate_view(view, i);
    }

    println!(
        "cargo:warning=Validated default viewconf: {} views, {total_tracks} top tracks",
        views.len()
    );
}

fn validate_view(view: &serde_json::Value, index: usize) -> usize {
    let view_uid = view
        .get("uid")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| {
            panic!("\n\nVIEWCONF BUILD ERROR: View at index {index} missing 'uid' field\n");
        });

    let top = view
        .get("tracks")
        .and_then(|t| t.get("top"))
        .and_then(|t| t.as_array())
        .unwrap_or_else(|| {
            panic!(
                "\n\nVIEWCONF BUILD ERROR: View '{view_uid}' (index {index}) missing 'tracks.top' array\n"
            );
        });

    for (j, track) in top.iter().enumerate() {
        assert!(
            track.get("uid").and_then(|v| v.as_str()).is_some(),
            "\n\nVIEWCONF BUILD ERROR: View '{view_uid}' track {j} missing 'uid' field\n"
        );
        assert!(
            track.get("type").and_then(|v| v.as_str()).is_some(),
            "\n\nVIEWCONF BUILD ERROR: View '{view_uid}' track {j} missing 'type' field\n"
        );
    }

    top.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the default viewconf changes
    println!("cargo:rerun-if-changed=viewconfs/default.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
