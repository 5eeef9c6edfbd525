// src/services/tendencia.rs

use crate::models::estrategia::{MonthlyCounts, TrendTag};

/// Variação percentual de M1 para M0. Sem produção em M1 a variação é 0.
pub fn variacao_percentual(m1: u32, m0: u32) -> f64 {
    if m1 > 0 {
        ((f64::from(m0) - f64::from(m1)) / f64::from(m1)) * 100.0
    } else {
        0.0
    }
}

/// Classifica a tendência de uma loja a partir de M2, M1 e M0.
///
/// As regras são avaliadas nesta ordem e a primeira que casar vence:
///
/// 1. `Queda`: zerou a produção depois de produzir em M1, ou variação <= -30%.
/// 2. `Atencao`: variação em (-30%, -5%], ou dois meses zerados depois de produzir em M2.
/// 3. `Comecando`: variação >= 10%, ou voltou a produzir depois de um mês zerado.
/// 4. `Estavel`: todo o resto.
///
/// M3 não participa da decisão.
pub fn classify_trend(m2: u32, m1: u32, m0: u32) -> TrendTag {
    let pct = variacao_percentual(m1, m0);

    if (m0 == 0 && m1 > 0) || pct <= -30.0 {
        return TrendTag::Queda;
    }

    if (pct > -30.0 && pct <= -5.0) || (m0 == 0 && m1 == 0 && m2 > 0) {
        return TrendTag::Atencao;
    }

    // m2 >= 0 vale sempre para contagens sem sinal
    if pct >= 10.0 || (m0 > 0 && m1 == 0) {
        return TrendTag::Comecando;
    }

    TrendTag::Estavel
}

pub fn classify_counts(counts: &MonthlyCounts) -> TrendTag {
    classify_trend(counts.m2, counts.m1, counts.m0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(7, 100, 70 => TrendTag::Queda ; "queda de 30 por cento no limite")]
    #[test_case(7, 100, 71 => TrendTag::Atencao ; "queda de 29 por cento")]
    #[test_case(7, 100, 95 => TrendTag::Atencao ; "queda de 5 por cento no limite")]
    #[test_case(7, 100, 96 => TrendTag::Estavel ; "queda de 4 por cento")]
    #[test_case(7, 100, 109 => TrendTag::Estavel ; "alta de 9 por cento")]
    #[test_case(7, 100, 110 => TrendTag::Comecando ; "alta de 10 por cento no limite")]
    #[test_case(5, 0, 0 => TrendTag::Atencao ; "dois meses zerados depois de produzir")]
    #[test_case(0, 0, 8 => TrendTag::Comecando ; "recomecou depois de mes zerado")]
    #[test_case(0, 5, 0 => TrendTag::Queda ; "parou de produzir")]
    #[test_case(40, 5, 0 => TrendTag::Queda ; "parou de produzir com m2 alto")]
    #[test_case(0, 0, 0 => TrendTag::Estavel ; "sem producao em nenhum mes")]
    #[test_case(3, 10, 10 => TrendTag::Estavel ; "producao constante")]
    fn boundary_literals(m2: u32, m1: u32, m0: u32) -> TrendTag {
        classify_trend(m2, m1, m0)
    }

    #[test]
    fn variation_is_zero_without_previous_production() {
        assert_eq!(variacao_percentual(0, 50), 0.0);
        assert_eq!(variacao_percentual(100, 70), -30.0);
        assert_eq!(variacao_percentual(100, 110), 10.0);
    }

    #[test]
    fn decline_wins_over_attention_when_both_hold() {
        // m0 == 0 com m1 > 0 também dá pct = -100, que cai nas duas primeiras faixas brutas
        assert_eq!(classify_trend(9, 1, 0), TrendTag::Queda);
    }

    #[test]
    fn attention_wins_over_growth_when_both_hold() {
        // Dois meses zerados: pct = 0 não é crescimento, mas o caso m2 > 0 casa com atenção
        assert_eq!(classify_trend(1, 0, 0), TrendTag::Atencao);
    }

    #[test]
    fn growth_wins_over_stable_on_fresh_start() {
        // pct = 0 estaria na faixa estável, mas o recomeço casa com crescimento
        assert_eq!(classify_trend(0, 0, 1), TrendTag::Comecando);
        assert_eq!(classify_trend(12, 0, 1), TrendTag::Comecando);
    }

    #[test]
    fn every_small_triple_gets_exactly_one_consistent_tag() {
        for m2 in 0..12u32 {
            for m1 in 0..25u32 {
                for m0 in 0..25u32 {
                    let tag = classify_trend(m2, m1, m0);
                    let pct = variacao_percentual(m1, m0);

                    match tag {
                        TrendTag::Queda => assert!((m0 == 0 && m1 > 0) || pct <= -30.0),
                        TrendTag::Atencao => {
                            assert!(pct > -30.0 && !(m0 == 0 && m1 > 0));
                            assert!(pct <= -5.0 || (m0 == 0 && m1 == 0 && m2 > 0));
                        }
                        TrendTag::Comecando => {
                            assert!(pct > -5.0);
                            assert!(pct >= 10.0 || (m0 > 0 && m1 == 0));
                        }
                        TrendTag::Estavel => {
                            assert!(pct > -5.0 && pct < 10.0);
                            assert!(!(m0 > 0 && m1 == 0));
                            assert!(!(m0 == 0 && m1 == 0 && m2 > 0));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn classification_is_idempotent_and_ignores_m3() {
        let a = MonthlyCounts::new(0, 4, 20, 13);
        let b = MonthlyCounts::new(999, 4, 20, 13);

        assert_eq!(classify_counts(&a), classify_counts(&a));
        assert_eq!(classify_counts(&a), classify_counts(&b));
        assert_eq!(classify_counts(&a), TrendTag::Queda);
    }
}
