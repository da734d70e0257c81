use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::catalog::Difficulty;

/// One wizard question. Order in the catalog is the order shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub id: &'static str,
    pub prompt: &'static str,
    pub context: &'static str,
    pub options: Vec<StepOption>,
}

impl Step {
    pub fn option(&self, value: &str) -> Option<&StepOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

/// An answer choice and the scoring directives it carries.
#[derive(Debug, Clone, Serialize)]
pub struct StepOption {
    pub value: &'static str,
    pub emoji: &'static str,
    pub title: &'static str,
    pub desc: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boost_vibes: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boost_moods: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub penalty_moods: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_bias: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_filter: Option<PageFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_bias: Option<PagesBias>,
    pub prefer_series: bool,
    pub award_bonus: bool,
}

impl StepOption {
    fn new(
        value: &'static str,
        emoji: &'static str,
        title: &'static str,
        desc: &'static str,
    ) -> Self {
        Self {
            value,
            emoji,
            title,
            desc,
            boost_vibes: Vec::new(),
            boost_moods: Vec::new(),
            penalty_moods: Vec::new(),
            diff_bias: None,
            page_filter: None,
            pages_bias: None,
            prefer_series: false,
            award_bonus: false,
        }
    }

    fn boost_vibes(mut self, vibes: &[&'static str]) -> Self {
        self.boost_vibes = vibes.to_vec();
        self
    }

    fn boost_moods(mut self, moods: &[&'static str]) -> Self {
        self.boost_moods = moods.to_vec();
        self
    }

    fn penalty_moods(mut self, moods: &[&'static str]) -> Self {
        self.penalty_moods = moods.to_vec();
        self
    }

    fn diff_bias(mut self, target: Difficulty) -> Self {
        self.diff_bias = Some(target);
        self
    }

    fn page_filter(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.page_filter = Some(PageFilter { min, max });
        self
    }

    fn pages_bias(mut self, bias: PagesBias) -> Self {
        self.pages_bias = Some(bias);
        self
    }

    fn prefer_series(mut self) -> Self {
        self.prefer_series = true;
        self
    }

    fn award_bonus(mut self) -> Self {
        self.award_bonus = true;
        self
    }
}

/// Inclusive page-count window. A filter with neither bound matches everything.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl PageFilter {
    pub fn contains(&self, pages: u32) -> bool {
        self.min.is_none_or(|min| pages >= min) && self.max.is_none_or(|max| pages <= max)
    }
}

/// Soft page-count nudge; discourages, never rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PagesBias {
    Corto,
    Largo,
}

/// The fixed question catalog, addressable by position and by step id.
#[derive(Debug)]
pub struct StepCatalog {
    steps: Vec<Step>,
    by_id: HashMap<&'static str, usize>,
}

impl StepCatalog {
    fn new(steps: Vec<Step>) -> Self {
        let by_id = steps
            .iter()
            .enumerate()
            .map(|(index, step)| (step.id, index))
            .collect();
        Self { steps, by_id }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&Step> {
        self.by_id.get(id).and_then(|index| self.steps.get(*index))
    }
}

static BUILTIN: LazyLock<StepCatalog> = LazyLock::new(build_builtin);

/// The product's five-question wizard, condensed from reading-motivation
/// research: motivation, emotional state, kind of experience, style factor,
/// format commitment.
pub fn builtin() -> &'static StepCatalog {
    &BUILTIN
}

fn build_builtin() -> StepCatalog {
    StepCatalog::new(vec![
        Step {
            id: "motivacion",
            prompt: "¿Qué te trae hoy a buscar un libro?",
            context: "Tu motivación guiará el tipo de lectura ideal",
            options: vec![
                StepOption::new(
                    "placer",
                    "🎭",
                    "Placer y entretenimiento",
                    "Disfrutar una buena historia, dejarme llevar",
                )
                .boost_vibes(&["ficción", "dramático", "aventura", "romántico", "humor"])
                .boost_moods(&["entretenido", "ligero", "emotivo", "inmersivo"]),
                StepOption::new(
                    "escapar",
                    "🚀",
                    "Escapar de la realidad",
                    "Transportarme a otros mundos, otras vidas",
                )
                .boost_vibes(&["fantasía", "ciencia ficción", "aventura", "histórico", "épico"])
                .boost_moods(&["inmersivo", "imaginativo", "especulativo"]),
                StepOption::new(
                    "crecer",
                    "🌱",
                    "Crecimiento personal",
                    "Entenderme mejor, ver el mundo diferente",
                )
                .boost_vibes(&["filosófico", "psicológico", "memorias", "dramático", "realista"])
                .boost_moods(&["reflexivo", "íntimo", "emotivo"]),
                StepOption::new(
                    "aprender",
                    "📚",
                    "Aprender algo nuevo",
                    "Conocimiento, ideas, perspectivas",
                )
                .boost_vibes(&["ensayo", "divulgación", "historia", "ciencias sociales", "política"])
                .boost_moods(&["reflexivo"])
                .diff_bias(Difficulty::Denso),
                StepOption::new(
                    "estimular",
                    "🧩",
                    "Estimular mi mente",
                    "Resolver misterios, desafiar mi pensamiento",
                )
                .boost_vibes(&["intriga", "policial", "filosófico", "ciencia ficción", "thriller"])
                .boost_moods(&["tenso", "inquietante", "especulativo"]),
            ],
        },
        Step {
            id: "estado",
            prompt: "¿Cómo te sientes ahora mismo?",
            context: "Tu estado emocional nos ayuda a elegir el tono adecuado",
            options: vec![
                StepOption::new(
                    "cansado",
                    "😮‍💨",
                    "Agotado/a",
                    "Necesito algo que no me exija mucho",
                )
                .boost_moods(&["ligero", "entretenido"])
                .penalty_moods(&["denso", "intenso", "oscuro", "reflexivo"])
                .diff_bias(Difficulty::Ligero)
                .pages_bias(PagesBias::Corto),
                StepOption::new(
                    "ansioso",
                    "😰",
                    "Ansioso/a o estresado/a",
                    "Busco calma, consuelo o distracción",
                )
                .boost_moods(&["ligero", "íntimo", "entretenido", "emotivo"])
                .penalty_moods(&["tenso", "oscuro", "intenso", "inquietante"])
                .diff_bias(Difficulty::Ligero),
                // Sin penalizar oscuro: a veces la tristeza busca catarsis.
                StepOption::new(
                    "triste",
                    "🌧️",
                    "Triste o melancólico/a",
                    "Necesito compañía emocional",
                )
                .boost_moods(&["emotivo", "íntimo", "reflexivo"]),
                StepOption::new(
                    "aburrido",
                    "😐",
                    "Aburrido/a",
                    "Necesito algo que me atrape ya",
                )
                .boost_vibes(&["intriga", "policial", "aventura", "thriller"])
                .boost_moods(&["tenso", "inmersivo", "entretenido", "intenso"]),
                StepOption::new("curioso", "🤔", "Curioso/a", "Abierto/a a descubrir")
                    .boost_moods(&["reflexivo", "especulativo", "inmersivo", "imaginativo"]),
                StepOption::new("energico", "⚡", "Con energía", "Listo/a para un reto")
                    .boost_moods(&["reflexivo", "intenso", "inquietante", "tenso"])
                    .diff_bias(Difficulty::Denso)
                    .pages_bias(PagesBias::Largo),
            ],
        },
        Step {
            id: "experiencia",
            prompt: "¿Qué tipo de experiencia buscas?",
            context: "Identificación personal vs exploración de lo desconocido",
            options: vec![
                StepOption::new(
                    "espejo",
                    "🪞",
                    "Un espejo",
                    "Personajes y situaciones que reflejen mi vida",
                )
                .boost_vibes(&[
                    "realista",
                    "contemporáneo",
                    "psicológico",
                    "dramático",
                    "memorias",
                ]),
                StepOption::new(
                    "ventana",
                    "🪟",
                    "Una ventana",
                    "Mundos y vidas diferentes a la mía",
                )
                .boost_vibes(&["fantasía", "ciencia ficción", "histórico", "aventura", "épico"])
                .boost_moods(&["inmersivo", "imaginativo", "especulativo"]),
                StepOption::new(
                    "puerta",
                    "🚪",
                    "Una puerta",
                    "Algo que me transforme o me haga cuestionar",
                )
                .boost_vibes(&["filosófico", "distopía", "psicológico", "ensayo"])
                .boost_moods(&["reflexivo", "inquietante"])
                .award_bonus(),
                StepOption::new(
                    "montanarusa",
                    "🎢",
                    "Una montaña rusa",
                    "Emociones intensas, giros, adrenalina",
                )
                .boost_vibes(&["intriga", "policial", "thriller", "oscuro", "terror"])
                .boost_moods(&["tenso", "intenso", "oscuro"]),
            ],
        },
        Step {
            id: "factor",
            prompt: "¿Qué estilo te atrae más?",
            context: "Basado en factores psicológicos de preferencia lectora",
            options: vec![
                StepOption::new(
                    "trepidante",
                    "💥",
                    "Trepidante",
                    "Acción, aventura, ritmo rápido",
                )
                .boost_vibes(&["aventura", "ciencia ficción", "thriller", "acción", "bélico"])
                .boost_moods(&["tenso", "inmersivo", "entretenido"])
                .diff_bias(Difficulty::Ligero),
                StepOption::new(
                    "cerebral",
                    "🎓",
                    "Cerebral",
                    "Ideas, reflexión, análisis profundo",
                )
                .boost_vibes(&[
                    "ensayo",
                    "filosófico",
                    "ciencias sociales",
                    "divulgación",
                    "historia",
                ])
                .boost_moods(&["reflexivo"])
                .diff_bias(Difficulty::Denso),
                StepOption::new("oscuro", "🌑", "Oscuro", "Terror, misterio, lo prohibido")
                    .boost_vibes(&["oscuro", "terror", "gótico", "erótico", "policial"])
                    .boost_moods(&["oscuro", "tenso", "inquietante", "intenso"]),
                StepOption::new(
                    "emotivo",
                    "💝",
                    "Emotivo",
                    "Relaciones humanas, sentimientos",
                )
                .boost_vibes(&["romántico", "dramático", "psicológico", "memorias"])
                .boost_moods(&["emotivo", "íntimo"]),
                StepOption::new(
                    "imaginativo",
                    "✨",
                    "Imaginativo",
                    "Fantasía, mundos inventados, magia",
                )
                .boost_vibes(&["fantasía", "ciencia ficción", "realismo mágico"])
                .boost_moods(&["imaginativo", "especulativo", "inmersivo"]),
            ],
        },
        Step {
            id: "formato",
            prompt: "¿Cuánto tiempo quieres invertir?",
            context: "Extensión y tipo de compromiso",
            options: vec![
                StepOption::new(
                    "rapido",
                    "⚡",
                    "Lectura rápida",
                    "Menos de 250 páginas, terminar pronto",
                )
                .page_filter(None, Some(280)),
                StepOption::new(
                    "normal",
                    "📖",
                    "Una novela estándar",
                    "250-450 páginas, una semana o dos",
                )
                .page_filter(Some(200), Some(500)),
                StepOption::new(
                    "largo",
                    "📚",
                    "Quiero sumergirme",
                    "Libros extensos o sagas para seguir",
                )
                .page_filter(Some(400), None)
                .prefer_series(),
                StepOption::new(
                    "relatos",
                    "📑",
                    "Relatos cortos",
                    "Historias independientes que pueda picotear",
                )
                .boost_vibes(&["relatos cortos", "cuentos"]),
                StepOption::new(
                    "cualquiera",
                    "🎲",
                    "No me importa",
                    "Lo que sea, mientras sea bueno",
                ),
            ],
        },
    ])
}

/// `nextread steps`: print the question catalog.
pub fn run() {
    for (index, step) in builtin().steps().iter().enumerate() {
        println!("{}. [{}] {}", index + 1, step.id, step.prompt);
        println!("   {}", step.context);
        for option in &step.options {
            println!(
                "   {} {:<12} {} — {}",
                option.emoji, option.value, option.title, option.desc
            );
        }
        println!();
    }
}
