//! Master dispatch artifacts (toggle.h / toggle.c).
//!
//! The master header numbers every characterization, validates the
//! build-time `CHAR_ID` macro against that list, and includes the
//! matching characterization header; the master source does the same for
//! definitions. Options are documented once, under a `DOXYGEN` guard, in
//! their default form.

use crate::catalog::OptionCatalog;
use crate::resolve::ResolvedCharacterization;

use super::{default_view_line, doc_comment, file_stem, tidy};

/// Render toggle.h over the full characterization list.
pub fn master_header(
    catalog: &OptionCatalog,
    characterizations: &[ResolvedCharacterization],
) -> String {
    let mut code = String::new();

    code.push_str(
        "#ifndef TOGGLE_H\n\
         #define TOGGLE_H\n\
         \n\
         #ifdef __cplusplus\n\
         extern \"C\"\n\
         {\n\
         #endif\n\
         \n\
         /** @file toggle.h\n \
          * @brief Toggle definitions.\n \
          *\n \
          * This file validates the macro CHAR_ID and includes the\n \
          * corresponding characterization header.\n \
          *\n \
          * In the list of CHAR_IDs, always add to the end of the list and\n \
          * increment NUM_CHAR_IDS.\n \
          *\n \
          * Numbering starts with 1 because the compiler would treat an\n \
          * undefined CHAR_ID as 0.\n \
          */\n\
         \n\
         #include <stdbool.h>\n\
         #include <stdint.h>\n\
         \n",
    );

    if let Some(first) = characterizations.first() {
        code.push_str(&format!(
            "#ifdef DOXYGEN\n    \
             /** @brief Characterization ID (int).\n     \
              *\n     \
              * Defines the device characterization: the options and\n     \
              * features enabled.\n     \
              *\n     \
              * The characterization ID should be defined when calling the\n     \
              * build system (ex: `cmake -D CHAR_ID=...`) or the compiler\n     \
              * (ex: `gcc -D CHAR_ID=...`).\n     \
              */\n    \
             #define CHAR_ID {id}\n\
             #endif\n\
             \n\
             #ifndef CHAR_ID\n    \
             #define CHAR_ID {id}\n    \
             #warning \"CHAR_ID is not defined. Using default.\"\n\
             #endif\n\
             \n",
            id = first.char_id
        ));
    }

    code.push_str("/* Options documentation. */\n\n#ifdef DOXYGEN\n\n");
    for def in catalog.options() {
        code.push_str(&format!(
            "    {}\n    {}\n\n",
            doc_comment(&def.brief, &def.description, 4),
            default_view_line(def)
        ));
    }
    code.push_str("#endif /* DOXYGEN */\n\n");

    if !characterizations.is_empty() {
        code.push_str("/* List of CHAR_IDs. */\n");
        for (number, ch) in characterizations.iter().enumerate() {
            code.push_str(&format!(
                "#define {} {} /**< @brief {} */\n",
                ch.char_id,
                number + 1,
                ch.brief
            ));
        }
        code.push_str(&format!(
            "\n#define NUM_CHAR_IDS {} /**< @brief Number of char IDs. */\n\n",
            characterizations.len()
        ));
        code.push_str(
            "/* Validate CHAR_ID range. */\n\
             #if (CHAR_ID < 1 || CHAR_ID > NUM_CHAR_IDS)\n    \
             #error \"Macro CHAR_ID is not in the valid range.\"\n\
             #endif\n\
             \n",
        );
        code.push_str(&include_dispatch(characterizations, "h"));
        code.push('\n');
    }

    code.push_str(
        "#ifdef __cplusplus\n\
         }\n\
         #endif\n\
         \n\
         #endif /* TOGGLE_H */\n",
    );

    tidy(&code)
}

/// Render toggle.c over the full characterization list.
pub fn master_source(characterizations: &[ResolvedCharacterization]) -> String {
    let mut code = String::from("#include \"toggle.h\"\n\n");
    if !characterizations.is_empty() {
        code.push_str(&include_dispatch(characterizations, "c"));
    }
    tidy(&code)
}

/// The `CHAR_ID`-dispatched include chain over per-characterization files.
fn include_dispatch(characterizations: &[ResolvedCharacterization], extension: &str) -> String {
    let mut code = String::from(
        "/* Include the characterization. */\n\
         #ifdef DOXYGEN\n    \
         /* Nothing to include for Doxygen. */\n",
    );
    for ch in characterizations {
        code.push_str(&format!(
            "#elif (CHAR_ID == {})\n    #include \"characterizations/{}.{}\"\n",
            ch.char_id,
            file_stem(&ch.char_id),
            extension
        ));
    }
    code.push_str("#endif\n");
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve, Characterization};
    use togglegen_tables::Table;

    fn fixture() -> (OptionCatalog, Vec<ResolvedCharacterization>) {
        let defaults = "NAME\tDEFAULT\tTYPE\tDECL\tBRIEF\tDESCRIPTION\tH\tC\n\
            TESTING\t0\tOPTION\tMACRO\tTest mode.\t\t\t\n\
            SERIAL_DEBUG\tNO_SER_DBG\tOPTION\tMACRO_INT8\tSerial debug port.\t\t\t\n\
            NO_SER_DBG\t0\tVALUE\tMACRO_INT8\tNo serial debug.\t\t\t\n";
        let catalog = OptionCatalog::from_table(&Table::parse(defaults).unwrap()).unwrap();

        let chars = "CHAR_ID\tBRIEF\tDESCRIPTION\tSERIAL_DEBUG\n\
            HW_V1\tBoard v1.\t\t\n\
            HW_V2\tBoard v2.\t\t0\n";
        let characterizations =
            Characterization::from_table(&Table::parse(chars).unwrap(), &catalog).unwrap();
        let resolved = characterizations
            .iter()
            .map(|ch| resolve(&catalog, ch).unwrap())
            .collect();
        (catalog, resolved)
    }

    #[test]
    fn test_master_header_numbers_characterizations() {
        let (catalog, resolved) = fixture();
        let header = master_header(&catalog, &resolved);

        assert!(header.contains("#define HW_V1 1 /**< @brief Board v1. */"));
        assert!(header.contains("#define HW_V2 2 /**< @brief Board v2. */"));
        assert!(header.contains("#define NUM_CHAR_IDS 2"));
        assert!(header.contains("#if (CHAR_ID < 1 || CHAR_ID > NUM_CHAR_IDS)"));
    }

    #[test]
    fn test_master_header_falls_back_to_first_characterization() {
        let (catalog, resolved) = fixture();
        let header = master_header(&catalog, &resolved);
        assert!(header.contains("#ifndef CHAR_ID\n    #define CHAR_ID HW_V1"));
    }

    #[test]
    fn test_master_header_documents_defaults_symbolically() {
        let (catalog, resolved) = fixture();
        let header = master_header(&catalog, &resolved);
        // The DOXYGEN block shows the symbolic default, not the resolved
        // literal.
        assert!(header.contains("#define SERIAL_DEBUG NO_SER_DBG"));
    }

    #[test]
    fn test_master_header_dispatch() {
        let (catalog, resolved) = fixture();
        let header = master_header(&catalog, &resolved);
        assert!(header.contains(
            "#elif (CHAR_ID == HW_V2)\n    #include \"characterizations/hw_v2.h\""
        ));
    }

    #[test]
    fn test_master_source_dispatch() {
        let (_, resolved) = fixture();
        let source = master_source(&resolved);
        assert!(source.starts_with("#include \"toggle.h\"\n"));
        assert!(source.contains(
            "#elif (CHAR_ID == HW_V1)\n    #include \"characterizations/hw_v1.c\""
        ));
        assert!(source.trim_end().ends_with("#endif"));
    }
}
