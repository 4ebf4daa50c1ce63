use anyhow::{anyhow, Result};
use std::io::Write;

use super::{Classification, MutationCall};

const HEADER: &str = "##fileformat=VCFv4.3\n##source=traitseq\n\
##INFO=<ID=TRAIT,Number=1,Type=String,Description=\"Associated trait\">\n\
##INFO=<ID=CLASS,Number=1,Type=String,Description=\"targeted, catalogued or unknown\">\n\
##INFO=<ID=QPOS,Number=1,Type=Integer,Description=\"0-based position in the query sequence\">\n\
##INFO=<ID=CTX,Number=1,Type=String,Description=\"Aligned reference context\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

fn class_label(classification: &Classification) -> &'static str {
    match classification {
        Classification::Targeted(_) => "targeted",
        Classification::Catalogued(_) => "catalogued",
        Classification::Unknown => "unknown",
    }
}

/// Write mutation calls as VCF, one line per call, keyed by gene.
///
/// `POS` is `genomic_position` written unchanged. Catalog coordinates are
/// already 1-based (dbSNP style), so unlike the 0-based `QPOS` no offset is
/// applied.
pub fn write_vcf<W: Write>(writer: &mut W, calls: &[MutationCall]) -> Result<()> {
    writer.write_all(HEADER.as_bytes())?;

    for call in calls {
        let id = match call.matched_record.rsid() {
            "unknown" => ".",
            rsid => rsid,
        };
        let line = format!(
            "{gene}\t{pos}\t{id}\t{ref_base}\t{alt_base}\t.\tPASS\tTRAIT={trait_name};CLASS={class};QPOS={qpos};CTX={ctx}\n",
            gene = call.gene,
            pos = call.genomic_position,
            ref_base = call.reference_base,
            alt_base = call.observed_base,
            trait_name = call.matched_record.trait_name().replace(' ', "_"),
            class = class_label(&call.matched_record),
            qpos = call.position,
            ctx = call.context,
        );
        writer.write_all(line.as_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

/// Render calls into a VCF string.
pub fn render_vcf(calls: &[MutationCall]) -> Result<String> {
    let mut buffer = Vec::new();
    write_vcf(&mut buffer, calls)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered VCF is not valid UTF-8"))
}
