//! C text rendering.
//!
//! All rendering is pure string building over resolved characterizations;
//! nothing here touches the filesystem. Given identical inputs the output
//! is byte-identical, which the host build system relies on for
//! modification-time-based incremental rebuilds.

mod master;

pub use master::{master_header, master_source};

use crate::catalog::{default_header, default_source, DeclBase, OptionCatalog, OptionDef};
use crate::resolve::{ResolvedCharacterization, ResolvedOption};

/// File stem of a characterization's generated pair.
pub fn file_stem(char_id: &str) -> String {
    char_id.to_lowercase()
}

/// Render the header for one resolved characterization: per option in
/// catalog order, its documentation comment and substituted declaration.
pub fn characterization_header(
    catalog: &OptionCatalog,
    resolved: &ResolvedCharacterization,
) -> String {
    let stem = file_stem(&resolved.char_id);
    let guard = format!("CHARACTERIZATIONS_{}_H", resolved.char_id.to_uppercase());

    let mut code = String::new();
    code.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
    code.push_str(&format!(
        "/** @file {stem}.h\n * {}\n */\n\n",
        doc_body(&resolved.brief, &resolved.description, 0)
    ));

    for (def, option) in catalog.options().iter().zip(&resolved.options) {
        let line = render_header_line(def, option);
        if line.is_empty() {
            continue;
        }
        code.push_str(&doc_comment(&def.brief, &def.description, 0));
        code.push('\n');
        code.push_str(&line);
        code.push_str("\n\n");
    }

    code.push_str(&format!("#endif /* {guard} */\n"));
    tidy(&code)
}

/// Render the source for one resolved characterization. Options whose
/// source template is empty (macros without a custom C cell) contribute
/// nothing.
pub fn characterization_source(
    catalog: &OptionCatalog,
    resolved: &ResolvedCharacterization,
) -> String {
    let mut code = String::new();
    for (def, option) in catalog.options().iter().zip(&resolved.options) {
        let line = render_source_line(def, option);
        if line.is_empty() {
            continue;
        }
        code.push_str(&line);
        code.push('\n');
    }
    tidy(&code)
}

/// The substituted header declaration for one option.
pub fn render_header_line(def: &OptionDef, option: &ResolvedOption) -> String {
    let template = match &def.header_template {
        Some(custom) => custom.clone(),
        None => default_header(option.kind),
    };
    template.render(&option.name, &option.value, option.constness)
}

/// The substituted source definition for one option; empty for macros
/// without a custom C template.
pub fn render_source_line(def: &OptionDef, option: &ResolvedOption) -> String {
    let template = match &def.source_template {
        Some(custom) => custom.clone(),
        None => default_source(option.kind),
    };
    template.render(&option.name, &option.value, option.constness)
}

/// An option's declaration in its default, characterization-independent
/// form: raw default value, no TESTING reclassification. Used by the
/// documentation block of the master header, where the symbolic default
/// (e.g. an alias name) reads better than the resolved literal.
pub(crate) fn default_view_line(def: &OptionDef) -> String {
    let kind = def.decl.emitted_kind(false);
    let template = match &def.header_template {
        Some(custom) => custom.clone(),
        None => default_header(kind),
    };
    template.render(&def.name, &def.default, def.decl.base != DeclBase::Var)
}

/// Doxygen body: `@brief` plus description continuation lines, each
/// prefixed with ` * ` at the given indent.
pub(crate) fn doc_body(brief: &str, description: &str, indent: usize) -> String {
    let mut body = format!("@brief {brief}");
    if !description.is_empty() {
        let pad = " ".repeat(indent);
        body.push('\n');
        body.push_str(&pad);
        body.push_str(" *");
        for line in description.split('\n') {
            body.push('\n');
            body.push_str(&format!("{pad} * {line}"));
        }
    }
    body
}

/// Full documentation comment block.
pub(crate) fn doc_comment(brief: &str, description: &str, indent: usize) -> String {
    if description.is_empty() {
        format!("/** @brief {brief} */")
    } else {
        let pad = " ".repeat(indent);
        format!("/** {}\n{pad} */", doc_body(brief, description, indent))
    }
}

/// Final text cleanup: trailing whitespace stripped, blank-line runs
/// collapsed, exactly one trailing newline.
pub(crate) fn tidy(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut blank_run = 0usize;
    for line in code.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    let trimmed = out.trim_matches('\n');
    format!("{trimmed}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve, Characterization};
    use togglegen_tables::Table;

    fn catalog() -> OptionCatalog {
        let text = "NAME\tDEFAULT\tTYPE\tDECL\tBRIEF\tDESCRIPTION\tH\tC\n\
            TESTING\t0\tOPTION\tMACRO\tTest mode.\t\t\t\n\
            SERIAL_DEBUG\tNO_SER_DBG\tOPTION\tMACRO_INT8\tSerial debug port.\t\t\t\n\
            NO_SER_DBG\t0\tVALUE\tMACRO_INT8\tNo serial debug.\t\t\t\n\
            SER_DBG_UART3\t1\tVALUE\tMACRO_INT8\tDebug on UART3.\t\t\t\n\
            CLIENT_NAME\t\"\"\"dev\"\"\"\tOPTION\tCONST_CHAR_ARRAY\tClient name.\tShown in the boot banner.\t\t\n";
        OptionCatalog::from_table(&Table::parse(text).unwrap()).unwrap()
    }

    fn resolved(body: &str) -> ResolvedCharacterization {
        let text = format!("CHAR_ID\tBRIEF\tDESCRIPTION\tTESTING\tSERIAL_DEBUG\n{body}");
        let chars =
            Characterization::from_table(&Table::parse(&text).unwrap(), &catalog()).unwrap();
        resolve(&catalog(), &chars[0]).unwrap()
    }

    #[test]
    fn test_header_contains_guard_and_declarations() {
        let header = characterization_header(
            &catalog(),
            &resolved("HW_V2\tBoard v2.\t\t\tSER_DBG_UART3\n"),
        );

        assert!(header.starts_with("#ifndef CHARACTERIZATIONS_HW_V2_H\n"));
        assert!(header.ends_with("#endif /* CHARACTERIZATIONS_HW_V2_H */\n"));
        assert!(header.contains("/** @file hw_v2.h"));
        assert!(header.contains("#define SERIAL_DEBUG 1"));
        assert!(header.contains("extern const char CLIENT_NAME[];"));
        assert!(header.contains("/** @brief Serial debug port. */"));
    }

    #[test]
    fn test_testing_header_strips_constness() {
        let header =
            characterization_header(&catalog(), &resolved("TESTBED\tRig.\t\t1\t\n"));
        assert!(header.contains("extern char CLIENT_NAME[];"));
        assert!(header.contains("extern int8_t SERIAL_DEBUG;"));
        // Bare MACRO options keep their macro form.
        assert!(header.contains("#define TESTING 1"));
    }

    #[test]
    fn test_source_definitions() {
        let source =
            characterization_source(&catalog(), &resolved("HW_V1\tBoard v1.\t\t\t\n"));
        // Macros emit nothing in the source file.
        assert!(!source.contains("SERIAL_DEBUG"));
        assert!(source.contains("const char CLIENT_NAME[] = \"dev\";"));
    }

    #[test]
    fn test_source_definitions_under_testing() {
        let source =
            characterization_source(&catalog(), &resolved("TESTBED\tRig.\t\t1\t\n"));
        assert!(source.contains("char CLIENT_NAME[] = \"dev\";"));
        assert!(!source.contains("const char CLIENT_NAME"));
        // Reclassified macros gain a runtime definition.
        assert!(source.contains("int8_t SERIAL_DEBUG = 0;"));
    }

    #[test]
    fn test_doc_comment_single_and_multi_line() {
        assert_eq!(doc_comment("Brief.", "", 0), "/** @brief Brief. */");
        assert_eq!(
            doc_comment("Brief.", "Line one.\nLine two.", 0),
            "/** @brief Brief.\n *\n * Line one.\n * Line two.\n */"
        );
        assert_eq!(
            doc_comment("Brief.", "Detail.", 4),
            "/** @brief Brief.\n     *\n     * Detail.\n     */"
        );
    }

    #[test]
    fn test_tidy() {
        assert_eq!(tidy("a  \n\n\n\nb\n"), "a\n\nb\n");
        assert_eq!(tidy("\n\na\n\n"), "a\n");
        assert_eq!(tidy(""), "\n");
    }
}
