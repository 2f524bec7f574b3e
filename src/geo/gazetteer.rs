//! Reference place names for approximate matching: the municipalities of
//! Mato Grosso plus the national state capitals.

use super::match_key;

pub const MT_MUNICIPALITIES: &[&str] = &[
    "Acorizal", "Água Boa", "Alta Floresta", "Alto Araguaia", "Alto Boa Vista",
    "Alto Garças", "Alto Paraguai", "Alto Taquari", "Apiacás", "Araguaiana",
    "Araguainha", "Araputanga", "Arenápolis", "Aripuanã", "Barão de Melgaço",
    "Barra do Bugres", "Barra do Garças", "Bom Jesus do Araguaia", "Brasnorte", "Cáceres",
    "Campinápolis", "Campo Novo do Parecis", "Campo Verde", "Campos de Júlio",
    "Canabrava do Norte", "Canarana", "Carlinda", "Castanheira", "Chapada dos Guimarães",
    "Cláudia", "Cocalinho", "Colíder", "Colniza", "Comodoro", "Confresa",
    "Conquista D'Oeste", "Cotriguaçu", "Cuiabá", "Curvelândia", "Denise", "Diamantino",
    "Dom Aquino", "Feliz Natal", "Figueirópolis D'Oeste", "Gaúcha do Norte",
    "General Carneiro", "Glória D'Oeste", "Guarantã do Norte", "Guiratinga", "Indiavaí",
    "Ipiranga do Norte", "Itanhangá", "Itaúba", "Itiquira", "Jaciara", "Jangada", "Jauru",
    "Juara", "Juína", "Juruena", "Juscimeira", "Lambari D'Oeste", "Lucas do Rio Verde",
    "Luciara", "Marcelândia", "Matupá", "Mirassol D'Oeste", "Nobres", "Nortelândia",
    "Nossa Senhora do Livramento", "Nova Bandeirantes", "Nova Brasilândia",
    "Nova Canaã do Norte", "Nova Guarita", "Nova Lacerda", "Nova Marilândia",
    "Nova Maringá", "Nova Monte Verde", "Nova Mutum", "Nova Nazaré", "Nova Olímpia",
    "Nova Santa Helena", "Nova Ubiratã", "Nova Xavantina", "Novo Horizonte do Norte",
    "Novo Mundo", "Novo Santo Antônio", "Novo São Joaquim", "Paranaíta", "Paranatinga",
    "Pedra Preta", "Peixoto de Azevedo", "Planalto da Serra", "Poconé",
    "Pontal do Araguaia", "Ponte Branca", "Pontes e Lacerda", "Porto Alegre do Norte",
    "Porto dos Gaúchos", "Porto Esperidião", "Porto Estrela", "Poxoréu",
    "Primavera do Leste", "Querência", "Reserva do Cabaçal", "Ribeirão Cascalheira",
    "Ribeirãozinho", "Rio Branco", "Rondolândia", "Rondonópolis", "Rosário Oeste",
    "Salto do Céu", "Santa Carmem", "Santa Cruz do Xingu", "Santa Rita do Trivelato",
    "Santa Terezinha", "Santo Afonso", "Santo Antônio do Leste", "Santo Antônio do Leverger",
    "São Félix do Araguaia", "São José do Povo", "São José do Rio Claro",
    "São José do Xingu", "São José dos Quatro Marcos", "São Pedro da Cipa", "Sapezal",
    "Serra Nova Dourada", "Sinop", "Sorriso", "Tabaporã", "Tangará da Serra", "Tapurah",
    "Terra Nova do Norte", "Tesouro", "Torixoréu", "União do Sul", "Vale de São Domingos",
    "Várzea Grande", "Vera", "Vila Bela da Santíssima Trindade", "Vila Rica",
];

pub const NATIONAL_CAPITALS: &[&str] = &[
    "Aracaju", "Belém", "Belo Horizonte", "Boa Vista", "Brasília", "Campo Grande",
    "Cuiabá", "Curitiba", "Florianópolis", "Fortaleza", "Goiânia", "João Pessoa",
    "Macapá", "Maceió", "Manaus", "Natal", "Palmas", "Porto Alegre", "Porto Velho",
    "Recife", "Rio Branco", "Rio de Janeiro", "Salvador", "São Luís", "São Paulo",
    "Teresina", "Vitória",
];

#[derive(Debug, Clone)]
pub struct GazetteerEntry {
    pub name: &'static str,
    /// Folded, lowercased, punctuation-free form used for scoring.
    pub key: String,
}

/// Fixed list of canonical place names, deduplicated by match key.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
}

impl Gazetteer {
    pub fn new<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a &'static str>,
    {
        let mut entries: Vec<GazetteerEntry> = Vec::new();
        for &name in names {
            let key = match_key(name);
            if entries.iter().any(|e| e.key == key) {
                continue;
            }
            entries.push(GazetteerEntry { name, key });
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GazetteerEntry> {
        self.entries.get(index)
    }

    /// Entry whose match key equals `key` exactly.
    pub fn find(&self, key: &str) -> Option<&GazetteerEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new(MT_MUNICIPALITIES.iter().chain(NATIONAL_CAPITALS))
    }
}
