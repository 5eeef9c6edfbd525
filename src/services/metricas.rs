// src/services/metricas.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    models::estrategia::{
        AggregateMetrics, BloqueioMotivo, CascataPontosAtivos, DiasInoperantes, LojaMetricRow,
        MonthlyCounts, SupervisorMetricas, SupervisorRollup, Variacao,
    },
    services::tendencia::classify_counts,
};

fn percentual(parte: f64, total: f64) -> f64 {
    if total > 0.0 { (parte / total) * 100.0 } else { 0.0 }
}

fn uma_casa(valor: f64) -> f64 {
    (valor * 10.0).round() / 10.0
}

/// Agrega as contagens das lojas do escopo em uma única passada.
///
/// Os contadores de transição (zeraram, novas, voltaram...) e a contagem por
/// tendência são classificações independentes: a mesma loja pode estar em
/// "voltaram" e em `comecando` ao mesmo tempo.
pub fn build_aggregate(rows: &[MonthlyCounts]) -> AggregateMetrics {
    let mut m = AggregateMetrics::default();

    for c in rows {
        m.total_contas_m0 += u64::from(c.m0);
        m.total_contas_m1 += u64::from(c.m1);
        m.variacao_total += i64::from(c.m0) - i64::from(c.m1);
        m.total_lojas += 1;

        if c.m0 > 0 {
            m.lojas_com_producao_m0 += 1;
        }
        if c.m1 > 0 {
            m.lojas_com_producao_m1 += 1;
        }
        if c.m1 > 0 && c.m0 == 0 {
            m.lojas_que_zeraram += 1;
        }
        if c.m1 == 0 && c.m0 > 0 {
            m.lojas_novas += 1;
        }
        if c.m2 > 0 && c.m1 == 0 && c.m0 > 0 {
            m.lojas_que_voltaram += 1;
        }
        if c.m1 > 0 && c.m0 > 0 {
            m.lojas_estaveis_ativas += 1;
        }
        if c.m0 < c.m1 {
            m.lojas_queda_producao += 1;
        }
        if c.m0 == 0 {
            m.lojas_sem_movimento += 1;
        }

        m.tendencias.record(classify_counts(c));
    }

    m.crescimento_percentual = percentual(m.variacao_total as f64, m.total_contas_m1 as f64);
    m.produtividade_geral = percentual(m.lojas_com_producao_m0 as f64, m.total_lojas as f64);
    m.media_por_loja = if m.lojas_com_producao_m0 > 0 {
        (m.total_contas_m0 as f64 / m.lojas_com_producao_m0 as f64).round() as u64
    } else {
        0
    };

    m
}

struct GrupoSupervisao {
    descricao: Option<String>,
    nome_supervisor: Option<String>,
    lojas: HashSet<i64>,
    contagens: Vec<MonthlyCounts>,
    cresceram: u64,
    cairam: u64,
    estaveis: u64,
}

/// Roll-up por chave de supervisão para a visão gerencial.
///
/// Cada grupo recebe o mesmo agregado de [`build_aggregate`]. Cresceram/caíram/
/// estáveis comparam só M0 com M1; não é a mesma divisão das faixas de
/// tendência e os dois números podem divergir para a mesma loja.
pub fn build_supervisor_rollup(rows: &[LojaMetricRow]) -> Vec<SupervisorRollup> {
    let mut grupos: HashMap<Option<i64>, GrupoSupervisao> = HashMap::new();

    for row in rows {
        let c = row.counts();
        let grupo = grupos
            .entry(row.chave_supervisao)
            .or_insert_with(|| GrupoSupervisao {
                descricao: row.desc_supervisao.clone(),
                nome_supervisor: row.nome_supervisor.clone(),
                lojas: HashSet::new(),
                contagens: Vec::new(),
                cresceram: 0,
                cairam: 0,
                estaveis: 0,
            });

        if c.m0 > c.m1 {
            grupo.cresceram += 1;
        }
        if c.m0 < c.m1 {
            grupo.cairam += 1;
        }
        if c.m0 == c.m1 && c.m0 > 0 {
            grupo.estaveis += 1;
        }
        grupo.contagens.push(c);
        grupo.lojas.insert(row.chave_loja);
    }

    let mut rollup: Vec<SupervisorRollup> = grupos
        .into_iter()
        .map(|(chave, grupo)| {
            let mut agregado = build_aggregate(&grupo.contagens);

            // Lojas distintas; percentuais com uma casa decimal
            agregado.total_lojas = grupo.lojas.len() as u64;
            agregado.crescimento_percentual = uma_casa(agregado.crescimento_percentual);
            agregado.produtividade_geral = uma_casa(percentual(
                agregado.lojas_com_producao_m0 as f64,
                agregado.total_lojas as f64,
            ));

            SupervisorRollup {
                descricao: grupo.descricao,
                chave_supervisao: chave,
                nome_supervisor: grupo.nome_supervisor,
                metricas: SupervisorMetricas {
                    agregado,
                    lojas_cresceram: grupo.cresceram,
                    lojas_cairam: grupo.cairam,
                    lojas_estaveis: grupo.estaveis,
                },
            }
        })
        .collect();

    // Ordena pela descrição; supervisões sem descrição vão para o fim
    rollup.sort_by(|a, b| match (&a.descricao, &b.descricao) {
        (Some(x), Some(y)) => x.cmp(y).then(a.chave_supervisao.cmp(&b.chave_supervisao)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.chave_supervisao.cmp(&b.chave_supervisao),
    });

    rollup
}

fn rotulo_perda(categoria: &str) -> Option<&'static str> {
    match categoria {
        "ENCERRADO" => Some("Encerrado"),
        "EQUIP_RETIRADA" => Some("Equip. Retirado"),
        "BLOQUEADO" => Some("Bloqueado"),
        "INOPERANTE" => Some("Inoperante"),
        _ => None,
    }
}

fn rotulo_ganho(categoria: &str) -> Option<&'static str> {
    match categoria {
        "CONTRATAÇÃO" => Some("Contratação"),
        "REATIVAÇÃO" => Some("Reativação"),
        _ => None,
    }
}

/// Cascata de pontos ativos: perdas (ativo em M1, inativo em M0) por categoria,
/// ganhos por contratação/reativação e os que se mantiveram.
pub fn build_cascata(rows: &[LojaMetricRow]) -> CascataPontosAtivos {
    let mut cascata = CascataPontosAtivos::default();
    let mut perdas: BTreeMap<String, u64> = BTreeMap::new();
    let mut ganhos: BTreeMap<String, u64> = BTreeMap::new();
    let mut bloqueios: HashMap<String, u64> = HashMap::new();
    let mut dias: BTreeMap<i32, u64> = BTreeMap::new();

    for row in rows {
        let c = row.counts();
        cascata.total_m1 += u64::from(c.m1);
        cascata.total_m0 += u64::from(c.m0);
        cascata.total_lojas += 1;

        let categoria = row
            .categoria
            .as_deref()
            .map(|cat| cat.trim().to_uppercase())
            .unwrap_or_default();
        let perdeu = c.m1 == 1 && c.m0 == 0;

        if perdeu {
            *perdas.entry(categoria.clone()).or_default() += 1;
        }
        if rotulo_ganho(&categoria).is_some() {
            *ganhos.entry(categoria.clone()).or_default() += 1;
        }
        if categoria == "MANTEVE" {
            cascata.manteve += 1;
        }

        if perdeu && categoria == "BLOQUEADO" {
            let motivo = row
                .motivo_bloqueio
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or("Não informado")
                .to_string();
            *bloqueios.entry(motivo).or_default() += 1;
        }

        if perdeu && categoria == "INOPERANTE" {
            if let Some(d) = row.dias_inoperantes.filter(|d| *d > 0) {
                *dias.entry(d).or_default() += 1;
            }
        }
    }

    cascata.variacoes_negativas = perdas
        .into_iter()
        .filter_map(|(cat, qtd)| {
            rotulo_perda(&cat).map(|key| Variacao { key: key.to_string(), value: -(qtd as i64) })
        })
        .collect();

    cascata.variacoes_positivas = ganhos
        .into_iter()
        .filter_map(|(cat, qtd)| {
            rotulo_ganho(&cat).map(|key| Variacao { key: key.to_string(), value: qtd as i64 })
        })
        .collect();

    let mut dados_bloqueios: Vec<BloqueioMotivo> = bloqueios
        .into_iter()
        .map(|(motivo, quantidade)| BloqueioMotivo { motivo, quantidade })
        .collect();
    dados_bloqueios.sort_by(|a, b| b.quantidade.cmp(&a.quantidade).then_with(|| a.motivo.cmp(&b.motivo)));
    cascata.dados_bloqueios = dados_bloqueios;

    cascata.dados_dias_inoperantes = dias
        .into_iter()
        .map(|(dias, quantidade)| DiasInoperantes { dias, quantidade })
        .collect();

    cascata
}
