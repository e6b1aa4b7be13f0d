//! Read and write [Newick](https://en.wikipedia.org/wiki/Newick_format) text.

use crate::{Branch, FromNewick, Node, NodeIndex, Phylogeny};
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use num_traits::AsPrimitive;

/// Characters that force a label to be quoted on output.
const RESERVED: [char; 9] = ['(', ')', ',', ':', ';', '\'', ' ', '\t', '['];

/// Splits a Newick node [`str`] into its label and its `:length[:confidence]` attributes.
///
/// Quoted labels may contain any reserved character, including `:`.
pub(crate) fn split_label(text: &str) -> (&str, &str) {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('\'') {
        if let Some(end) = rest.find('\'') {
            return (&rest[..end], &rest[end + 1..]);
        }
    }
    match text.find(':') {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    }
}

/// Returns a [`Phylogeny`] parsed from a Newick [`str`].
///
/// The branch length of the root, if any, is discarded.
///
/// ## Examples
///
/// ```rust
/// use igtreez_phylo::newick;
///
/// let phylo = newick::parse("(A:1,(C:1,D:3)B:2)root;")?;
/// assert_eq!(phylo.len(), 5);
/// let root = phylo.get_root_index()?;
/// assert_eq!(phylo.get_node(root)?.label(), "root");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
///
/// Unbalanced parentheses are an error.
///
/// ```rust
/// # use igtreez_phylo::newick;
/// assert!(newick::parse("((A,B);").is_err());
/// assert!(newick::parse("(A,B));").is_err());
/// assert!(newick::parse("").is_err());
/// ```
pub fn parse(newick: &str) -> Result<Phylogeny, Report> {
    let text = strip_comments(newick)?;
    let text = text.trim();
    let text = text.strip_suffix(';').unwrap_or(text).trim_end();
    if text.is_empty() {
        return Err(eyre!("Newick string is empty."));
    }

    let chars: Vec<char> = text.chars().collect();
    let mut phylogeny = Phylogeny::new();
    let mut pos = 0;
    parse_nodes(&chars, &mut pos, &mut phylogeny)
        .wrap_err_with(|| eyre!("Failed to parse newick: {newick}"))?;

    if pos != chars.len() {
        return Err(eyre!("Unexpected character at position {pos} of newick: {newick}"));
    }
    Ok(phylogeny)
}

/// Removes every `[...]` comment outside quoted labels.
///
/// ```rust
/// use igtreez_phylo::newick;
/// assert_eq!(newick::strip_comments("[&R] (A[x]:1,'B[1]':2)GL;")?, " (A:1,'B[1]':2)GL;");
/// assert!(newick::strip_comments("(A:1[x)GL;").is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn strip_comments(newick: &str) -> Result<String, Report> {
    let mut text = String::with_capacity(newick.len());
    let (mut quoted, mut comment) = (false, false);
    for c in newick.chars() {
        match c {
            '[' if !quoted && !comment => comment = true,
            ']' if comment => comment = false,
            _ if comment => (),
            '\'' => {
                quoted = !quoted;
                text.push(c);
            }
            _ => text.push(c),
        }
    }
    if comment {
        return Err(eyre!("Unterminated comment in newick: {newick}"));
    }
    Ok(text)
}

/// Parses the nodes starting at `pos`, children before their parent.
///
/// Open subtrees are kept on a stack, so deep trees do not grow the call stack.
/// Returns the index of the root.
fn parse_nodes(chars: &[char], pos: &mut usize, phylogeny: &mut Phylogeny) -> Result<NodeIndex, Report> {
    let mut open: Vec<Vec<(NodeIndex, Branch)>> = Vec::new();
    loop {
        skip_whitespace(chars, pos);
        if chars.get(*pos) == Some(&'(') {
            *pos += 1;
            open.push(Vec::new());
            continue;
        }

        // close subtrees until the next sibling, or the root
        let mut children = Vec::new();
        loop {
            let (node_index, branch) = add_node(chars, pos, phylogeny, children)?;
            skip_whitespace(chars, pos);
            let Some(siblings) = open.last_mut() else {
                return Ok(node_index);
            };
            siblings.push((node_index, branch));
            match chars.get(*pos) {
                Some(',') => {
                    *pos += 1;
                    break;
                }
                Some(')') => {
                    *pos += 1;
                    children = open.pop().unwrap_or_default();
                }
                _ => return Err(eyre!("Unclosed parenthesis at position {pos}.")),
            }
        }
    }
}

/// Reads the label at `pos` and adds its node, with branches to its children.
///
/// Returns the index of the node and the branch leading to it.
fn add_node(
    chars: &[char],
    pos: &mut usize,
    phylogeny: &mut Phylogeny,
    children: Vec<(NodeIndex, Branch)>,
) -> Result<(NodeIndex, Branch), Report> {
    let text = read_label(chars, pos)?;
    let node = Node::from_newick(&text)?;
    let branch = Branch::from_newick(&text)?;

    let node_index = phylogeny.add_node(node);
    for (child, child_branch) in children {
        phylogeny.add_branch(node_index, child, child_branch)?;
    }

    Ok((node_index, branch))
}

/// Reads a node label and its attributes, stopping at the next unquoted delimiter.
fn read_label(chars: &[char], pos: &mut usize) -> Result<String, Report> {
    let start = *pos;
    let mut quoted = false;
    while let Some(c) = chars.get(*pos) {
        match c {
            '\'' => quoted = !quoted,
            '(' | ')' | ',' | ';' if !quoted => break,
            _ => (),
        }
        *pos += 1;
    }
    if quoted {
        return Err(eyre!("Unterminated quoted label starting at position {start}."));
    }
    Ok(chars[start..*pos].iter().collect::<String>().trim().to_string())
}

#[rustfmt::skip]
fn skip_whitespace(chars: &[char], pos: &mut usize) { while chars.get(*pos).is_some_and(|c| c.is_whitespace()) { *pos += 1; } }

/// Returns a Newick [`String`] for a [`Phylogeny`].
///
/// Every non-root node is written with its branch length, labels containing
/// reserved characters are quoted.
///
/// ## Examples
///
/// ```rust
/// use igtreez_phylo::newick;
///
/// let phylo = newick::parse("(A:1,'B 1':0.5)R;")?;
/// assert_eq!(newick::write(&phylo)?, "(A:1,'B 1':0.5)R;");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn write(phylogeny: &Phylogeny) -> Result<String, Report> {
    let root = phylogeny.get_root_index()?;
    let mut newick = write_subtree(phylogeny, root)?;
    newick.push(';');
    Ok(newick)
}

fn write_subtree(phylogeny: &Phylogeny, node_index: NodeIndex) -> Result<String, Report> {
    let children = phylogeny.get_children(node_index);
    let mut newick = String::new();

    if !children.is_empty() {
        let inner = children
            .into_iter()
            .map(|child| {
                let length: f32 = phylogeny.get_branch(child).map(|b| b.as_()).unwrap_or_default();
                Ok(format!("{}:{length}", write_subtree(phylogeny, child)?))
            })
            .collect::<Result<Vec<_>, Report>>()?
            .into_iter()
            .join(",");
        newick = format!("({inner})");
    }

    let label = phylogeny.get_node(node_index)?.label();
    match label.contains(RESERVED) {
        true => newick.push_str(&format!("'{label}'")),
        false => newick.push_str(label),
    }
    Ok(newick)
}
