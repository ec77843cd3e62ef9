use pybootstrap_cli::models::PackageRequirement;
use pybootstrap_cli::resolver::ResolutionPhase;
use pybootstrap_cli::version::{extract_name, format_requirement, normalize_name};

fn sample_requirements() -> Vec<PackageRequirement> {
    let names = [
        "numpy",
        "NumPy",
        "scikit-learn",
        "Scikit_Learn",
        "zope.interface",
        "typing_extensions",
        "Django",
        "ruamel.yaml.clib",
        "a",
        "py3dmol",
    ];
    let versions = [None, Some("2.3.1"), Some("1.0"), Some("2024.1.post2"), Some("3.0.0rc1")];

    names
        .iter()
        .flat_map(|name| versions.iter().map(move |version| PackageRequirement::new(*name, *version)))
        .collect()
}

#[test]
fn formatting_is_idempotent() {
    for req in sample_requirements() {
        for phase in ResolutionPhase::ALL {
            let once = format_requirement(&req, phase);
            let twice = format_requirement(&req, phase);
            assert_eq!(once, twice, "{req} at {phase}");

            // Formatting the bare rendering again must not change it
            let bare = PackageRequirement::new(format_requirement(&req, ResolutionPhase::Unconstrained), None);
            assert_eq!(
                format_requirement(&bare, phase),
                format_requirement(&req, ResolutionPhase::Unconstrained)
            );
        }
    }
}

#[test]
fn extract_inverts_format_modulo_normalization() {
    for req in sample_requirements() {
        for phase in ResolutionPhase::ALL {
            let formatted = format_requirement(&req, phase);
            assert_eq!(
                extract_name(&formatted),
                Some(normalize_name(&req.name)),
                "{formatted} ({phase})"
            );
        }
    }
}

#[test]
fn phase_renderings() {
    let req = PackageRequirement::new("numpy", Some("2.3.1"));
    let rendered: Vec<String> = ResolutionPhase::ALL.iter().map(|phase| format_requirement(&req, *phase)).collect();
    assert_eq!(rendered, vec!["numpy==2.3.1", "numpy>=2.3.1", "numpy"]);

    let unversioned = PackageRequirement::new("requests", None);
    for phase in ResolutionPhase::ALL {
        assert_eq!(format_requirement(&unversioned, phase), "requests");
    }
}

#[test]
fn extract_name_strips_extras_and_operator() {
    assert_eq!(extract_name("Django[bcrypt,argon2]~=3.0").as_deref(), Some("django"));
}

#[test]
fn extract_name_handles_every_operator_and_marker() {
    let cases = [
        ("foo==1.2.3", Some("foo")),
        ("foo>=1.2.3", Some("foo")),
        ("foo~=1.2", Some("foo")),
        ("foo[bar]==1.2.3", Some("foo")),
        ("foo==1.2.3; sys_platform==\"win32\"", Some("foo")),
        ("Foo_Bar.baz!=2", Some("foo-bar-baz")),
        ("", None),
        ("~=1.0", None),
        ("   ;   ", None),
    ];
    for (input, expected) in cases {
        assert_eq!(extract_name(input).as_deref(), expected, "input: {input:?}");
    }
}
