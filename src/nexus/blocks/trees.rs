//! TREES block codec.
//!
//! ```text
//! [PROPERTIES [PARTIALTREES=YES|NO] [ROOTED=YES|NO];]
//! [TRANSLATE token name, ..;]
//! TREE [*] name = [&R|&U] newick;
//! ..
//! ```
//! Leaf labels are mapped through TRANSLATE and must name taxa (or are
//! discovered). PROPERTIES `rooted` overrides the per-tree `[&R]`/`[&U]`.

use crate::model::{PhyloTree, TaxaBlock, TreesBlock, TreesFormat};
use crate::newick::{to_newick, NewickParser};
use crate::nexus::blocks::{at_block_end, skip_command, Parsed, TaxaContext, TaxonResolver};
use crate::nexus::defs::{PROPERTIES, TRANSLATE, TREE};
use crate::nexus::writer::NexusWriter;
use crate::parser::command::OptionList;
use crate::parser::utils::normalize_tree_name;
use crate::parser::{ByteSource, ParsingError, ParsingErrorType, Token, Tokenizer, Warnings};
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::io::Write;

// =#========================================================================#=
// PARSING
// =#========================================================================$=
/// Parses the body of a TREES block.
///
/// # Errors
/// Structural error on a leaf naming an unknown taxon (outside discovery
/// mode), an unlabeled leaf, or a tree missing taxa under
/// `partialTrees=no`. Malformed Newick text is a lexical error.
pub fn parse_trees<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    context: TaxaContext,
    warnings: &mut Warnings,
) -> Result<Parsed<TreesBlock>, ParsingError> {
    let mut resolver = TaxonResolver::new(context);
    let newick = NewickParser::new();
    let mut declared_partial: Option<bool> = None;
    let mut declared_rooted: Option<bool> = None;
    let mut translation: Option<Vec<(String, String)>> = None;
    let mut trees: Vec<(PhyloTree, BTreeSet<usize>, usize)> = Vec::new();

    while !at_block_end(tokenizer)? {
        if tokenizer.consume_if_ignore_case("properties")? {
            let mut options = OptionList::read(tokenizer, "PROPERTIES")?;
            declared_partial = options.take_flag("partialtrees")?;
            declared_rooted = options.take_flag("rooted")?;
            options.finish()?;
        } else if tokenizer.consume_if_ignore_case("translate")? {
            translation = Some(parse_translate(tokenizer)?);
        } else if tokenizer.consume_if_ignore_case("tree")? {
            let line = tokenizer.line();
            let (mut tree, rooted_comment) = parse_tree_statement(tokenizer, &newick)?;
            tree.set_rooted(declared_rooted.or(rooted_comment).unwrap_or(false));
            let taxa = resolve_leaves(&mut tree, translation.as_deref(), &mut resolver, line)?;
            trees.push((tree, taxa, line));
        } else {
            skip_command(tokenizer, "TREES", warnings)?;
        }
    }

    // Partial trees, against all taxa known at the end of the block
    let ntax = resolver.ntax();
    let missing_taxa = trees.iter().find(|(_, taxa, _)| taxa.len() < ntax);
    if let (Some(false), Some((tree, _, line))) = (declared_partial, missing_taxa) {
        return Err(ParsingError::at_line(
            ParsingErrorType::Structural(format!(
                "tree '{}' does not contain all {ntax} taxa, but partialTrees=no",
                tree.name()
            )),
            *line,
        ));
    }
    let partial = declared_partial.unwrap_or(missing_taxa.is_some());

    let mut block = TreesBlock::new()
        .with_partial(partial)
        .with_format(TreesFormat::default().with_translate(translation.is_some()));
    if let Some(translation) = translation {
        block = block.with_translation(translation);
    }
    for (tree, _, _) in trees {
        block.push(tree);
    }

    Ok(Parsed {
        block,
        discovered: resolver.into_discovered(),
    })
}

/// Parses `token name, ..;` (after TRANSLATE).
fn parse_translate<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<Vec<(String, String)>, ParsingError> {
    let mut table = Vec::new();
    loop {
        if tokenizer.consume_if_ignore_case(";")? {
            return Ok(table);
        }
        let token = tokenizer.next_label()?;
        let name = tokenizer.next_label()?;
        if table.iter().any(|(t, _)| *t == token) {
            return Err(ParsingError::structural(tokenizer, format!("token '{token}' translated twice")));
        }
        table.push((token, name));
        match tokenizer.peek_token()? {
            Token::Punctuation(',') => {
                tokenizer.next_token()?;
            }
            Token::Punctuation(';') => {}
            other => {
                return Err(ParsingError::lexical(tokenizer, format!("',' or ';' in TRANSLATE, got {other}")));
            }
        }
    }
}

/// Parses `[*] name = [&R] newick;` (after TREE).
///
/// # Returns
/// The tree and the rootedness given by a `[&R]`/`[&U]` comment, if any.
fn parse_tree_statement<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    newick: &NewickParser,
) -> Result<(PhyloTree, Option<bool>), ParsingError> {
    tokenizer.consume_if_ignore_case("*")?;
    let name = normalize_tree_name(&tokenizer.next_label()?);
    tokenizer.match_ignore_case("=")?;

    let previous = tokenizer.set_collect_comments(true);
    let skipped = tokenizer.skip_eols();
    let comments = tokenizer.take_comments();
    tokenizer.set_collect_comments(previous);
    skipped?;

    let rooted = comments.iter().rev().find_map(|comment| {
        match comment.trim().to_ascii_lowercase().as_str() {
            "&r" => Some(true),
            "&u" => Some(false),
            _ => None,
        }
    });
    let tree = newick.parse_tree(tokenizer, &name)?;
    Ok((tree, rooted))
}

/// Maps leaf labels through the translation table onto taxon names.
///
/// # Returns
/// The (1-based) taxa the tree contains.
fn resolve_leaves(
    tree: &mut PhyloTree,
    translation: Option<&[(String, String)]>,
    resolver: &mut TaxonResolver,
    line: usize,
) -> Result<BTreeSet<usize>, ParsingError> {
    let structural = |msg: String| ParsingError::at_line(ParsingErrorType::Structural(msg), line);
    let mut taxa = BTreeSet::new();

    for leaf in tree.leaves() {
        let Some(label) = tree[leaf].label() else {
            return Err(structural(format!("tree '{}' has an unlabeled leaf", tree.name())));
        };
        let name = translation
            .and_then(|table| table.iter().find(|(token, _)| token == label))
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| label.to_string());
        let Some(t) = resolver.try_resolve(&name) else {
            return Err(structural(format!("unknown taxon '{name}' in tree '{}'", tree.name())));
        };
        if !taxa.insert(t) {
            return Err(structural(format!("taxon '{name}' occurs twice in tree '{}'", tree.name())));
        }
        tree.set_label(leaf, Some(name));
    }
    Ok(taxa)
}

// =#========================================================================#=
// WRITING
// =#========================================================================$=
/// Writes the body of a TREES block.
///
/// With `format.translate`, leaves are written as tokens of the block's
/// translation table, or of the table `1 .. ntax` over `taxa` if the block
/// has none.
pub fn write_trees<W: Write>(
    writer: &mut NexusWriter<W>,
    taxa: &TaxaBlock,
    block: &TreesBlock,
    format: &TreesFormat,
) -> io::Result<()> {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    // "\tPROPERTIES partialTrees=no rooted=yes;"
    writer
        .tab()?
        .write_all(PROPERTIES)?
        .option("partialTrees", yes_no(block.is_partial()))?;
    if let Some(rooted) = block.common_rootedness() {
        writer.option("rooted", yes_no(rooted))?;
    }
    writer.semicolon_ln()?;

    let table: Option<Vec<(String, String)>> = format.translate.then(|| {
        block.translation().map(|t| t.to_vec()).unwrap_or_else(|| {
            taxa.iter()
                .enumerate()
                .map(|(i, taxon)| ((i + 1).to_string(), taxon.name.clone()))
                .collect()
        })
    });

    // "\tTRANSLATE\n\t\ttoken name,\n...;"
    let mut tokens: HashMap<&str, &str> = HashMap::new();
    if let Some(table) = &table {
        writer.tab()?.write_all(TRANSLATE)?.newline()?;
        for (i, (token, name)) in table.iter().enumerate() {
            writer.tab()?.tab()?.label(token)?.space()?.label(name)?;
            if i + 1 < table.len() {
                writer.comma()?;
            }
            writer.newline()?;
            tokens.insert(name.as_str(), token.as_str());
        }
        writer.tab()?.semicolon_ln()?;
    }

    // "\tTREE name = [&R] newick;"
    for tree in block.iter() {
        let newick = to_newick(tree, |label| tokens.get(label).map(|t| t.to_string()));
        writer
            .tab()?
            .write_all(TREE)?
            .space()?
            .label(tree.name())?
            .space()?
            .equals()?
            .space()?
            .text(if tree.is_rooted() { "[&R]" } else { "[&U]" })?
            .space()?
            .text(&newick)?
            .newline()?;
    }
    Ok(())
}
