//! Roster fixtures shared by provider and CLI tests.

/// Header row accepted by the TSV roster reader.
pub const TSV_HEADER: &str = "Name\tHandle\tFaction\tTags\tTwHandle\tTwFollowers\tTwFollowing";

/// Six personas across three factions, with country and global hubs.
///
/// # Examples
/// ```
/// use followgraph_test_support::roster::{MIXED_ROSTER_TSV, TSV_HEADER};
///
/// assert!(MIXED_ROSTER_TSV.starts_with(TSV_HEADER));
/// assert_eq!(MIXED_ROSTER_TSV.lines().count(), 7);
/// ```
pub const MIXED_ROSTER_TSV: &str = "\
Name\tHandle\tFaction\tTags\tTwHandle\tTwFollowers\tTwFollowing
Ada Lovelace\tada\tblue\t#uk #hub_uk\t@ada\t400\t20
Bo Diddley\tbo\tblue\t#uk\t\t30\t10
Cy Twombly\tcy\tred\t#fr #hub\t@cy\t900\t15
Di Fossey\tdi\tred\t#fr\t\t12\t8
Ed Wood\ted\tgreen\t\t\t3\t5
Fy Lee\tfy\tgreen\t#uk #fr\t@fy\t50\t6
";

/// Number of personas in [`MIXED_ROSTER_TSV`].
pub const MIXED_ROSTER_LEN: usize = 6;

/// Builds a same-faction TSV roster with handles `p0`, `p1`, ...
///
/// # Examples
/// ```
/// use followgraph_test_support::roster::uniform_roster_tsv;
///
/// let tsv = uniform_roster_tsv(3, 2, 2);
/// assert_eq!(tsv.lines().count(), 4);
/// assert!(tsv.contains("\tp2\t"));
/// ```
#[must_use]
pub fn uniform_roster_tsv(size: usize, followers: u64, following: u64) -> String {
    let mut tsv = String::from("Name\tHandle\tFaction\tTags\tTwFollowers\tTwFollowing\n");
    for i in 0..size {
        tsv.push_str(&format!(
            "Persona {i}\tp{i}\tcrew\t\t{followers}\t{following}\n"
        ));
    }
    tsv
}
