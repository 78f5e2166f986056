//! Parser selection for single-file uploads.
//!
//! The file's extension plus an institution name somewhere in the file name
//! decide the parser. Anything else is unsupported.

use std::path::Path;

use ledgerflow_io::ParserKind;

pub fn pick_parser(path: &Path) -> Option<ParserKind> {
    let name = path.file_name()?.to_str()?.to_lowercase();
    let ext = path.extension()?.to_str()?.to_lowercase();

    let kind = match ext.as_str() {
        "pdf" if name.contains("brubank") => ParserKind::BrubankPdf,
        "pdf" if name.contains("visa") || name.contains("santander") => ParserKind::SantanderVisaPdf,
        "csv" if name.contains("mercadopago") => ParserKind::MercadoPagoCsv,
        "csv" if name.contains("deel") => ParserKind::DeelCsv,
        "xlsx" if name.contains("santander") => ParserKind::SantanderXlsx,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(name: &str) -> Option<ParserKind> {
        pick_parser(Path::new(name))
    }

    #[test]
    fn extension_and_institution_pick_the_parser() {
        assert_eq!(pick("uploads/Brubank_Marzo.PDF"), Some(ParserKind::BrubankPdf));
        assert_eq!(pick("resumen-visa-2024-03.pdf"), Some(ParserKind::SantanderVisaPdf));
        assert_eq!(pick("santander_tarjeta.pdf"), Some(ParserKind::SantanderVisaPdf));
        assert_eq!(pick("mercadopago-activity.csv"), Some(ParserKind::MercadoPagoCsv));
        assert_eq!(pick("Deel balance.csv"), Some(ParserKind::DeelCsv));
        assert_eq!(pick("Santander movimientos.xlsx"), Some(ParserKind::SantanderXlsx));
    }

    #[test]
    fn brubank_wins_over_santander_for_pdf() {
        assert_eq!(pick("brubank-vs-santander.pdf"), Some(ParserKind::BrubankPdf));
    }

    #[test]
    fn unsupported_names() {
        assert_eq!(pick("santander.csv"), None);
        assert_eq!(pick("deel.xlsx"), None);
        assert_eq!(pick("galicia.pdf"), None);
        assert_eq!(pick("mercadopago"), None);
    }
}
