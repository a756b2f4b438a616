//! Text formats: edge lists in, partitions out (and back in).
//!
//! Edge list: one edge per line, `source target [weight]`, whitespace
//! separated, weight 1 when omitted. A line whose first token is not a
//! number is a comment. Partition: `raw_id<TAB>group` per node, with `-1`
//! for discarded nodes.

use crate::error::{Error, Result};
use crate::graph::SparseGraph;
use crate::partition::DISCARD;
use crate::relation::{DuplicateMode, RelationList, SortOrder};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Read an edge list.
///
/// Duplicate edges are summed. With `symmetrize`, every edge without a
/// reverse gets one of the same weight. The result is sorted ascending,
/// unique, normalized and id-shared, ready for [`SparseGraph::new`].
///
/// # Errors
///
/// [`Error::Parse`] for a numeric line with other than 2 or 3 tokens or an
/// unparsable id or weight; nothing is returned for a partly valid input.
pub fn read_edge_list<R: BufRead>(reader: R, symmetrize: bool) -> Result<RelationList> {
    let mut edges = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if is_comment(&tokens) {
            continue;
        }
        if tokens.len() != 2 && tokens.len() != 3 {
            let message = format!("expected 2 or 3 tokens, found {}", tokens.len());
            return Err(parse_error(number, message));
        }
        let source = parse_id(tokens[0], number)?;
        let target = parse_id(tokens[1], number)?;
        let weight = match tokens.get(2) {
            Some(token) => token
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite())
                .ok_or_else(|| parse_error(number, format!("invalid weight '{token}'")))?,
            None => 1.0,
        };
        edges.push((source, target, weight));
    }

    let mut list = RelationList::from_edges(edges);
    let _ = list.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
    if symmetrize {
        list.symmetrize();
        let _ = list.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
    }
    list.normalize(false);
    Ok(list)
}

/// Read an edge list file into a graph.
pub fn read_graph(path: impl AsRef<Path>, symmetrize: bool) -> Result<SparseGraph> {
    let file = File::open(path)?;
    SparseGraph::new(read_edge_list(BufReader::new(file), symmetrize)?)
}

/// Write `raw_id<TAB>group` for every node in normal-id order.
pub fn write_partition<W: Write>(
    mut writer: W,
    graph: &SparseGraph,
    partition: &[usize],
) -> Result<()> {
    if partition.len() != graph.node_count() {
        return Err(Error::PartitionLength {
            expected: graph.node_count(),
            found: partition.len(),
        });
    }
    for (node, &group) in partition.iter().enumerate() {
        let raw = graph.raw_id(node);
        if group == DISCARD {
            writeln!(writer, "{raw}\t-1")?;
        } else {
            writeln!(writer, "{raw}\t{group}")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write a partition file.
pub fn write_partition_file(
    path: impl AsRef<Path>,
    graph: &SparseGraph,
    partition: &[usize],
) -> Result<()> {
    let file = File::create(path)?;
    write_partition(BufWriter::new(file), graph, partition)
}

/// Read a partition for `graph`.
///
/// Raw ids are mapped through the graph's normalization. `-1` and nodes
/// absent from the input are DISCARD. Group ids are kept as written.
///
/// # Errors
///
/// [`Error::UnknownNode`] for a raw id outside the graph, [`Error::Parse`]
/// for a malformed line or a group id equal to [`DISCARD`].
pub fn read_partition<R: BufRead>(reader: R, graph: &SparseGraph) -> Result<Vec<usize>> {
    let mut partition = vec![DISCARD; graph.node_count()];
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if is_comment(&tokens) {
            continue;
        }
        if tokens.len() != 2 {
            let message = format!("expected 2 tokens, found {}", tokens.len());
            return Err(parse_error(number, message));
        }
        let raw = parse_id(tokens[0], number)?;
        let node = graph.lineage().lookup(raw).ok_or(Error::UnknownNode(raw))?;
        partition[node] = parse_group(tokens[1], number)?;
    }
    Ok(partition)
}

/// Empty lines and lines not starting with a number.
fn is_comment(tokens: &[&str]) -> bool {
    tokens.first().map_or(true, |t| t.parse::<f64>().is_err())
}

fn parse_id(token: &str, line: usize) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| parse_error(line, format!("invalid node id '{token}'")))
}

/// `-1` is DISCARD; the sentinel's own value is not a valid group id.
fn parse_group(token: &str, line: usize) -> Result<usize> {
    match token {
        "-1" => Ok(DISCARD),
        _ => match parse_id(token, line)? {
            DISCARD => Err(parse_error(line, format!("reserved group id '{token}'"))),
            group => Ok(group),
        },
    }
}

fn parse_error(line: usize, message: String) -> Error {
    Error::Parse { line, message }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn graph(text: &str) -> SparseGraph {
        let list = read_edge_list(text.as_bytes(), false).unwrap();
        SparseGraph::new(list).unwrap()
    }

    #[test]
    fn test_reads_weights_and_comments() {
        let text = "# header\nsource target weight\n10 20 2.5\n20 30\n\n10 20 0.5\n";
        let list = read_edge_list(text.as_bytes(), false).unwrap();
        let edges: Vec<_> = list.iter().collect();
        assert_eq!(edges, vec![(0, 1, 3.0), (1, 2, 1.0)]);
        assert_eq!(list.raw_row(2), Some(30));
        assert!(list.is_normalized() && list.is_unique());
    }

    #[test]
    fn test_symmetrize_adds_reverse_edges() {
        let list = read_edge_list("1 2 4\n2 3\n3 2 7\n".as_bytes(), true).unwrap();
        assert_eq!(
            list.iter().collect::<Vec<_>>(),
            vec![(0, 1, 4.0), (1, 0, 4.0), (1, 2, 1.0), (2, 1, 7.0)]
        );
    }

    #[test]
    fn test_bad_token_count_is_an_error() {
        let err = read_edge_list("1 2\n3 4 5 6\n".as_bytes(), false).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_bad_weight_is_an_error() {
        let err = read_edge_list("1 2 heavy\n".as_bytes(), false).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
        let err = read_edge_list("1.5 2\n".as_bytes(), false).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_partition_round_trip() {
        let g = graph("100 200\n200 300\n400 100 -1\n");
        let p = vec![0, 0, DISCARD, 1];
        let mut out = Vec::new();
        write_partition(&mut out, &g, &p).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert_eq!(text, "100\t0\n200\t0\n300\t-1\n400\t1\n");
        assert_eq!(read_partition(out.as_slice(), &g).unwrap(), p);
    }

    #[test]
    fn test_missing_nodes_are_discarded() {
        let g = graph("1 2\n2 3\n");
        let p = read_partition("3\t5\n".as_bytes(), &g).unwrap();
        assert_eq!(p, vec![DISCARD, DISCARD, 5]);
    }

    #[test]
    fn test_sentinel_group_id_is_rejected() {
        let g = graph("1 2\n");
        let text = format!("1\t{}\n", usize::MAX);
        let err = read_partition(text.as_bytes(), &g).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
        let p = read_partition("1\t-1\n".as_bytes(), &g).unwrap();
        assert_eq!(p, vec![DISCARD; 2]);
    }

    #[test]
    fn test_unknown_node_is_an_error() {
        let g = graph("1 2\n");
        let result = read_partition("9\t0\n".as_bytes(), &g);
        assert!(matches!(result, Err(Error::UnknownNode(9))));
    }
}
