//! Bootstrap stub rendering.
//!
//! The stub is the executable head of every bundle: a short POSIX shell
//! script that maps the bundle's logical name into the environment,
//! extracts the payload found after the marker line into a scratch
//! directory, and delegates to the entry point. It carries no other
//! logic.

/// Line separating the stub text from the payload bytes.
pub const PAYLOAD_MARKER: &str = "__SELFPACK_PAYLOAD__";

/// Synthetic manifest path under which the stub is reported.
pub const STUB_ENTRY_NAME: &str = "stub.sh";

/// Width of the zero-padded payload offset field.
///
/// A fixed-width field keeps the stub's byte length independent of the
/// offset value, so rendering needs no fixpoint iteration.
const OFFSET_WIDTH: usize = 8;

/// Render the bootstrap stub for a bundle.
///
/// The returned text ends with the marker line; the payload starts at the
/// byte immediately after it, and the embedded `tail -c +N` offset points
/// exactly there (1-based, as `tail` counts).
#[must_use]
pub fn render_stub(bundle_name: &str, entry_point: &str) -> String {
    // First pass with a placeholder settles the length; the offset field
    // is fixed-width, so the second pass cannot change it.
    let probe = render_with_offset(bundle_name, entry_point, 0);
    let offset = probe.len() + 1;
    render_with_offset(bundle_name, entry_point, offset)
}

fn render_with_offset(bundle_name: &str, entry_point: &str, offset: usize) -> String {
    let offset_field = format!("{offset:0width$}", width = OFFSET_WIDTH);
    format!(
        r#"#!/bin/sh
# {bundle_name}: self-extracting bundle
set -eu
SELFPACK_BUNDLE="{bundle_name}"
export SELFPACK_BUNDLE
ENTRY="{entry_point}"
SELF="$(cd -- "$(dirname -- "$0")" && pwd)/$(basename -- "$0")"
WORKDIR="$(mktemp -d "${{TMPDIR:-/tmp}}/${{SELFPACK_BUNDLE}}.XXXXXX")"
trap 'rm -rf "$WORKDIR"' EXIT
tail -c +{offset_field} "$SELF" | tar -xzf - -C "$WORKDIR"
SELFPACK_ROOT="$WORKDIR"
export SELFPACK_ROOT
status=0
"$WORKDIR/$ENTRY" "$@" || status=$?
exit "$status"
{PAYLOAD_MARKER}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn stub_is_a_shell_script_ending_with_the_marker() {
        let stub = render_stub("tool.run", "bin/tool");
        assert!(stub.starts_with("#!/bin/sh\n"));
        assert!(stub.ends_with(&format!("{PAYLOAD_MARKER}\n")));
    }

    #[test]
    fn stub_maps_name_and_delegates_to_entry() {
        let stub = render_stub("tool.run", "bin/tool");
        assert!(stub.contains("SELFPACK_BUNDLE=\"tool.run\""));
        assert!(stub.contains("ENTRY=\"bin/tool\""));
        assert!(stub.contains("\"$WORKDIR/$ENTRY\" \"$@\""));
    }

    #[test]
    fn embedded_offset_points_past_the_stub() {
        let stub = render_stub("tool.run", "bin/tool");
        let offset_digits: String = stub
            .lines()
            .find_map(|line| line.strip_prefix("tail -c +"))
            .and_then(|rest| rest.split_whitespace().next())
            .map(std::borrow::ToOwned::to_owned)
            .expect("stub contains a tail command");

        let offset: usize = offset_digits.parse().expect("offset parses");
        assert_eq!(offset, stub.len() + 1);
    }

    #[rstest]
    #[case::short_name("a", "b")]
    #[case::long_name("a-much-longer-bundle-name.run", "bin/deeply/nested/entry")]
    fn stub_length_is_independent_of_offset_value(
        #[case] name: &str,
        #[case] entry: &str,
    ) {
        let probe = render_with_offset(name, entry, 0);
        let real = render_stub(name, entry);
        assert_eq!(probe.len(), real.len());
    }
}
