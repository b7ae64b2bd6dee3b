//! Writes `sample_acoes_sesmt.csv`, a year of synthetic SESMT actions for
//! trying the dashboard without a real tracking sheet.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

const OUTPUT_PATH: &str = "sample_acoes_sesmt.csv";

const HEADERS: [&str; 8] = [
    "Data",
    "Evento",
    "Pessoas Impactadas",
    "Observações",
    "Colaborador",
    "Cargo",
    "Contrato",
    "Tipo",
];

/// (event, action type, typical audience)
const EVENTS: [(&str, &str, f64); 10] = [
    ("DDS - Diálogo Diário de Segurança", "Interno", 15.0),
    ("Inspeção de EPI", "Interno", 8.0),
    ("Treinamento NR-10", "Treinamento", 20.0),
    ("Treinamento NR-35 Trabalho em Altura", "Treinamento", 18.0),
    ("Simulado de Emergência", "Treinamento", 40.0),
    ("Palestra em Escola Municipal", "Comunidade", 120.0),
    ("Campanha Uso Seguro da Energia", "Comunidade", 250.0),
    ("Blitz de Segurança com Terceiros", "EQTL", 30.0),
    ("Auditoria Comportamental", "EQTL", 12.0),
    ("SIPAT", "Interno", 90.0),
];

/// (contract, collaborators working it)
const CONTRACTS: [(&str, [(&str, &str); 2]); 4] = [
    ("Oeste", [("Ana Souza", "Técnica de Segurança"), ("Bruno Lima", "Engenheiro de Segurança")]),
    ("Nordeste", [("Carla Dias", "Técnica de Segurança"), ("Diego Alves", "Supervisor")]),
    ("Norte", [("Elaine Rocha", "Técnica de Segurança"), ("Fábio Costa", "Encarregado")]),
    ("Sul", [("Gustavo Nunes", "Técnico de Segurança"), ("Helena Prado", "Coordenadora SESMT")]),
];

const OBSERVATIONS: [&str; 4] = [
    "",
    "Sem ocorrências",
    "Registro fotográfico enviado",
    "Reprogramar por chuva",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 2).context("invalid start date")?;

    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record(HEADERS)?;

    let mut rows = 0;
    let mut day = 0;
    while day < 365 {
        let date = first_day + Duration::days(day);
        let (event, action_type, audience) = EVENTS[rng.below(EVENTS.len())];
        let (contract, team) = CONTRACTS[rng.below(CONTRACTS.len())];
        let (collaborator, role) = team[rng.below(team.len())];
        let people = rng.gauss(audience, audience * 0.3).round().max(1.0) as u64;
        let observation = OBSERVATIONS[rng.below(OBSERVATIONS.len())];

        writer.write_record([
            date.format("%d/%m/%Y").to_string().as_str(),
            event,
            people.to_string().as_str(),
            observation,
            collaborator,
            role,
            contract,
            action_type,
        ])?;
        rows += 1;
        // Roughly two actions a week.
        day += 1 + rng.below(6) as i64;
    }
    writer.flush()?;

    println!("Wrote {rows} actions to {OUTPUT_PATH}");
    Ok(())
}
