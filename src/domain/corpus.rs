// ============================================================
// Layer 3 — Corpus Configurations
// ============================================================
// Each supported corpus ships a fixed set of symbol tables:
//
//   pos       Penn Treebank tags            (reserved + dense)
//   deprel    Stanford dependency relations (reserved + dense)
//   ner       Stanford NER classes          (reserved + dense)
//   subj_ner  NER classes a subject may take
//   obj_ner   NER classes an object may take
//   root      root-marker symbols "_" / "ROOT"
//   label     relation classes              (dense from 0)
//
// The tables are listed in id order: the symbol at index i of a
// reserved table gets id i + 2, of a label table id i.
//
// A CorpusConfig is built once at startup and handed explicitly
// to every stage that needs it.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::instance::{EMPTY_MARKER, ROOT_MARKER};
use crate::domain::symbols::SymbolTable;

const POS_TAGS: &[&str] = &[
    "NNP", "NN", "IN", "DT", ",", "JJ", "NNS", "VBD", "CD", "CC", ".", "RB", "VBN", "PRP", "TO",
    "VB", "VBG", "VBZ", "PRP$", ":", "POS", "''", "``", "-RRB-", "-LRB-", "VBP", "MD", "NNPS",
    "WP", "WDT", "WRB", "RP", "JJR", "JJS", "$", "FW", "RBR", "SYM", "EX", "RBS", "WP$", "PDT",
    "LS", "UH", "#",
];

const DEPRELS: &[&str] = &[
    "punct", "compound", "case", "nmod", "det", "nsubj", "amod", "conj", "dobj", "ROOT", "cc",
    "nmod:poss", "mark", "advmod", "appos", "nummod", "dep", "ccomp", "aux", "advcl", "acl:relcl",
    "xcomp", "cop", "acl", "auxpass", "nsubjpass", "nmod:tmod", "neg", "compound:prt", "mwe",
    "parataxis", "root", "nmod:npmod", "expl", "csubj", "cc:preconj", "iobj", "det:predet",
    "discourse", "csubjpass",
];

const NER_TAGS: &[&str] = &[
    "O", "PERSON", "ORGANIZATION", "LOCATION", "DATE", "NUMBER", "MISC", "DURATION", "MONEY",
    "PERCENT", "ORDINAL", "TIME", "SET",
];

const ROOT_MARKERS: &[&str] = &[EMPTY_MARKER, ROOT_MARKER];

const TACRED_SUBJ_NER: &[&str] = &["ORGANIZATION", "PERSON"];

const TACRED_OBJ_NER: &[&str] = &[
    "PERSON", "ORGANIZATION", "DATE", "NUMBER", "TITLE", "COUNTRY", "LOCATION", "CITY", "MISC",
    "STATE_OR_PROVINCE", "DURATION", "NATIONALITY", "CAUSE_OF_DEATH", "CRIMINAL_CHARGE",
    "RELIGION", "URL", "IDEOLOGY",
];

// KBP and NYT share their entity-type inventory.
const COARSE_ENTITY_NER: &[&str] = &["ORGANIZATION", "PERSON", "LOCATION", "MISC"];

const TACRED_LABELS: &[&str] = &[
    "no_relation",
    "per:title",
    "org:top_members/employees",
    "per:employee_of",
    "org:alternate_names",
    "org:country_of_headquarters",
    "per:countries_of_residence",
    "org:city_of_headquarters",
    "per:cities_of_residence",
    "per:age",
    "per:stateorprovinces_of_residence",
    "per:origin",
    "org:subsidiaries",
    "org:parents",
    "per:spouse",
    "org:stateorprovince_of_headquarters",
    "per:children",
    "per:other_family",
    "per:alternate_names",
    "org:members",
    "per:siblings",
    "per:schools_attended",
    "per:parents",
    "per:date_of_death",
    "org:member_of",
    "org:founded_by",
    "org:website",
    "per:cause_of_death",
    "org:political/religious_affiliation",
    "org:founded",
    "per:city_of_death",
    "org:shareholders",
    "org:number_of_employees/members",
    "per:date_of_birth",
    "per:city_of_birth",
    "per:charges",
    "per:stateorprovince_of_death",
    "per:religion",
    "per:stateorprovince_of_birth",
    "per:country_of_birth",
    "org:dissolved",
    "per:country_of_death",
];

const KBP_LABELS: &[&str] = &[
    "no_relation",
    "per:country_of_death",
    "per:country_of_birth",
    "per:parents",
    "per:children",
    "per:religion",
    "per:countries_of_residence",
];

const NYT_LABELS: &[&str] = &[
    "/business/person/company",
    "/people/person/nationality",
    "/people/deceased_person/place_of_death",
    "/location/country/capital",
    "/location/location/contains",
    "/people/person/place_lived",
    "/people/person/children",
    "/location/country/administrative_divisions",
    "/location/administrative_division/country",
    "/people/person/place_of_birth",
    "/location/neighborhood/neighborhood_of",
    "no_relation",
    "/business/company/major_shareholders",
    "/business/company_shareholder/major_shareholder_of",
    "/business/company/place_founded",
    "/business/company/founders",
    "/sports/sports_team/location",
    "/sports/sports_team_location/teams",
    "/business/company/advisors",
    "/people/person/ethnicity",
    "/people/ethnicity/people",
    "/people/ethnicity/geographic_distribution",
    "/people/person/religion",
    "/people/person/profession",
];

/// Label used for negative examples in every supported corpus.
pub const NO_RELATION: &str = "no_relation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
    Tacred,
    Kbp,
    Nyt,
}

impl CorpusKind {
    pub const ALL: [CorpusKind; 3] = [CorpusKind::Tacred, CorpusKind::Kbp, CorpusKind::Nyt];

    pub fn name(self) -> &'static str {
        match self {
            CorpusKind::Tacred => "tacred",
            CorpusKind::Kbp => "kbp",
            CorpusKind::Nyt => "nyt",
        }
    }

    /// Default location of the corpus files, e.g. `data/TACRED`.
    pub fn default_root(self) -> PathBuf {
        PathBuf::from("data").join(self.name().to_uppercase())
    }

    fn subj_ner(self) -> &'static [&'static str] {
        match self {
            CorpusKind::Tacred => TACRED_SUBJ_NER,
            CorpusKind::Kbp | CorpusKind::Nyt => COARSE_ENTITY_NER,
        }
    }

    fn obj_ner(self) -> &'static [&'static str] {
        match self {
            CorpusKind::Tacred => TACRED_OBJ_NER,
            CorpusKind::Kbp | CorpusKind::Nyt => COARSE_ENTITY_NER,
        }
    }

    fn labels(self) -> &'static [&'static str] {
        match self {
            CorpusKind::Tacred => TACRED_LABELS,
            CorpusKind::Kbp => KBP_LABELS,
            CorpusKind::Nyt => NYT_LABELS,
        }
    }
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorpusKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CorpusKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown corpus '{s}', expected one of: tacred, kbp, nyt"))
    }
}

/// The fixed tables of one corpus.
#[derive(Debug, Clone)]
pub struct CorpusTables {
    pub pos:      SymbolTable,
    pub deprel:   SymbolTable,
    pub ner:      SymbolTable,
    pub subj_ner: SymbolTable,
    pub obj_ner:  SymbolTable,
    pub root:     SymbolTable,
    pub label:    SymbolTable,
}

impl CorpusTables {
    pub fn for_corpus(kind: CorpusKind) -> Self {
        Self {
            pos:      SymbolTable::with_reserved(POS_TAGS.iter().copied()),
            deprel:   SymbolTable::with_reserved(DEPRELS.iter().copied()),
            ner:      SymbolTable::with_reserved(NER_TAGS.iter().copied()),
            subj_ner: SymbolTable::with_reserved(kind.subj_ner().iter().copied()),
            obj_ner:  SymbolTable::with_reserved(kind.obj_ner().iter().copied()),
            root:     SymbolTable::with_reserved(ROOT_MARKERS.iter().copied()),
            label:    SymbolTable::dense(kind.labels().iter().copied()),
        }
    }
}

/// Everything the pipeline needs to know about one corpus.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub kind:   CorpusKind,
    pub root:   PathBuf,
    pub tables: CorpusTables,
}

impl CorpusConfig {
    /// Build the configuration, rooted at `root` or the corpus default.
    pub fn new(kind: CorpusKind, root: Option<PathBuf>) -> Self {
        Self {
            kind,
            root: root.unwrap_or_else(|| kind.default_root()),
            tables: CorpusTables::for_corpus(kind),
        }
    }

    pub fn train_instances(&self) -> PathBuf {
        self.root.join("train.json")
    }

    pub fn test_instances(&self) -> PathBuf {
        self.root.join("test.json")
    }

    pub fn train_labels(&self) -> PathBuf {
        self.root.join("train_label.json")
    }

    pub fn test_labels(&self) -> PathBuf {
        self.root.join("test_label.json")
    }

    /// Where encoded artifacts are written.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join("dependency")
    }

    /// Id of the negative class.
    pub fn no_relation_id(&self) -> Option<u32> {
        self.tables.label.get(NO_RELATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::symbols::{PAD_ID, PAD_TOKEN, UNK_ID, UNK_TOKEN};

    #[test]
    fn test_known_pos_and_deprel_ids() {
        let t = CorpusTables::for_corpus(CorpusKind::Tacred);
        assert_eq!(t.pos.get("NNP"), Some(2));
        assert_eq!(t.pos.get("PRP$"), Some(20));
        assert_eq!(t.pos.get("#"), Some(46));
        assert_eq!(t.deprel.get("punct"), Some(2));
        assert_eq!(t.deprel.get("ROOT"), Some(11));
        assert_eq!(t.deprel.get("csubjpass"), Some(41));
        assert_eq!(t.ner.get("SET"), Some(14));
    }

    #[test]
    fn test_every_input_table_has_reserved_ids() {
        for kind in CorpusKind::ALL {
            let t = CorpusTables::for_corpus(kind);
            for table in [&t.pos, &t.deprel, &t.ner, &t.subj_ner, &t.obj_ner, &t.root] {
                assert_eq!(table.get(PAD_TOKEN), Some(PAD_ID));
                assert_eq!(table.get(UNK_TOKEN), Some(UNK_ID));
            }
            assert!(!t.label.contains(PAD_TOKEN));
        }
    }

    #[test]
    fn test_label_tables() {
        assert_eq!(CorpusTables::for_corpus(CorpusKind::Tacred).label.len(), 42);
        assert_eq!(CorpusTables::for_corpus(CorpusKind::Kbp).label.len(), 7);

        let nyt = CorpusConfig::new(CorpusKind::Nyt, None);
        assert_eq!(nyt.tables.label.len(), 24);
        assert_eq!(nyt.no_relation_id(), Some(11));
        assert_eq!(nyt.tables.label.get("/people/person/profession"), Some(23));
    }

    #[test]
    fn test_entity_tables_per_corpus() {
        let tacred = CorpusTables::for_corpus(CorpusKind::Tacred);
        assert_eq!(tacred.obj_ner.get("IDEOLOGY"), Some(18));
        assert_eq!(tacred.subj_ner.len(), 4);

        let kbp = CorpusTables::for_corpus(CorpusKind::Kbp);
        assert_eq!(kbp.subj_ner.get("MISC"), Some(5));
        assert_eq!(kbp.subj_ner, kbp.obj_ner);
    }

    #[test]
    fn test_root_marker_table() {
        let t = CorpusTables::for_corpus(CorpusKind::Kbp);
        assert_eq!(t.root.get(EMPTY_MARKER), Some(2));
        assert_eq!(t.root.get(ROOT_MARKER), Some(3));
    }

    #[test]
    fn test_parse_and_paths() {
        let kind: CorpusKind = "TACRED".parse().unwrap();
        assert_eq!(kind, CorpusKind::Tacred);
        assert!("conll".parse::<CorpusKind>().is_err());

        let cfg = CorpusConfig::new(kind, None);
        assert_eq!(cfg.root, PathBuf::from("data/TACRED"));
        assert_eq!(cfg.train_labels(), PathBuf::from("data/TACRED/train_label.json"));
        assert_eq!(cfg.output_dir(), PathBuf::from("data/TACRED/dependency"));
    }
}
