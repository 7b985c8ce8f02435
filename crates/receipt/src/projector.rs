//! Projection of a sale into the receipt dictionary

use crate::model::{Agent, Installment, Passenger, SaleId, SaleRecord, SubService};
use crate::store::SaleStore;
use crate::{ReceiptError, Result};
use chrono::NaiveDate;
use locale_text::{format_date_long, format_date_short, parse_stored_date, Locale};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// Everything a receipt template can reference
///
/// Field names serialize to the placeholder vocabulary (`cliente`, `daPagare`, ...).
/// No field is ever null: text defaults to `""`, amounts to `"0"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub cliente: String,
    pub indirizzo: String,
    pub codice_fiscale: String,
    /// All passenger names, comma separated
    pub passeggero: String,
    pub pnr: String,
    pub itinerario: String,
    pub servizio: String,
    pub metodo_pagamento: String,
    pub agente: String,
    pub neto: String,
    pub venduto: String,
    pub acconto: String,
    pub da_pagare: String,
    pub fee_agv: String,
    pub data_vendita: String,
    pub data_emissione: String,
    pub tiene_cuotas: bool,
    pub cuotas: Vec<InstallmentLine>,
    pub tiene_passeggeri: bool,
    pub passeggeri: Vec<PassengerLine>,
}

/// One row of the `cuotas` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallmentLine {
    pub numero: i32,
    pub precio: String,
    pub fecha: String,
    pub estado: String,
}

/// One row of the `passeggeri` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassengerLine {
    pub nome: String,
    pub neto: String,
    pub venduto: String,
    pub stato: String,
    /// Sale price of the insurance extra, empty when not purchased
    pub assicurazione: String,
    /// Sale price of the express-handling extra, empty when not purchased
    pub espresso: String,
    pub pagamento: String,
    pub attivazione: String,
}

/// Fetch a sale and project it
///
/// Fails with `NotFound` when the id does not resolve.
pub async fn project_sale(
    store: &dyn SaleStore,
    id: SaleId,
    locale: Locale,
    issued_on: NaiveDate,
) -> Result<ReceiptData> {
    let record = store
        .fetch_sale(id)
        .await?
        .ok_or(ReceiptError::NotFound(id))?;
    Ok(project(&record, locale, issued_on))
}

/// Project a sale record into receipt data
///
/// `issued_on` fills `dataEmissione`; passing it in keeps projection deterministic.
pub fn project(record: &SaleRecord, locale: Locale, issued_on: NaiveDate) -> ReceiptData {
    let sale = &record.sale;

    let mut installments: Vec<&Installment> = record.installments.iter().collect();
    installments.sort_by_key(|i| i.number);
    let cuotas: Vec<InstallmentLine> = installments
        .into_iter()
        .map(|i| project_installment(sale.id, i, locale))
        .collect();

    let passeggeri: Vec<PassengerLine> = record
        .passengers
        .iter()
        .map(|p| project_passenger(sale.id, p, locale))
        .collect();

    let passeggero = passeggeri
        .iter()
        .map(|p| p.nome.as_str())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    ReceiptData {
        cliente: text(&sale.client_name),
        indirizzo: text(&sale.address),
        codice_fiscale: text(&sale.fiscal_code),
        passeggero,
        pnr: text(&sale.payment_reference),
        itinerario: text(&sale.itinerary),
        servizio: text(&sale.service),
        metodo_pagamento: text(&sale.payment_method),
        agente: agent_display_name(record.agent.as_ref(), locale),
        neto: amount(sale.net_cost),
        venduto: amount(sale.sale_price),
        acconto: amount(sale.deposit_paid),
        da_pagare: amount(sale.balance_due),
        fee_agv: amount(sale.agent_fee),
        data_vendita: format_date_short(locale, sale.created_at.date_naive()),
        data_emissione: format_date_long(locale, issued_on),
        tiene_cuotas: !cuotas.is_empty(),
        cuotas,
        tiene_passeggeri: !passeggeri.is_empty(),
        passeggeri,
    }
}

/// Display name of a sale's creator
///
/// "First Last" trimmed, else the email, else the locale's generic label.
pub fn agent_display_name(agent: Option<&Agent>, locale: Locale) -> String {
    let Some(agent) = agent else {
        return locale.unknown_agent().to_string();
    };

    let full_name = format!(
        "{} {}",
        agent.first_name.as_deref().unwrap_or_default(),
        agent.last_name.as_deref().unwrap_or_default()
    );
    let full_name = full_name.trim();
    if !full_name.is_empty() {
        return full_name.to_string();
    }

    match agent.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => locale.unknown_agent().to_string(),
    }
}

fn project_installment(sale_id: SaleId, installment: &Installment, locale: Locale) -> InstallmentLine {
    let fecha = display_date(sale_id, "installment", installment.due_date.as_deref(), locale);
    let estado = if installment.paid {
        locale.paid()
    } else {
        locale.pending()
    };

    InstallmentLine {
        numero: installment.number,
        precio: amount(installment.amount),
        fecha,
        estado: estado.to_string(),
    }
}

fn project_passenger(sale_id: SaleId, passenger: &Passenger, locale: Locale) -> PassengerLine {
    let extra = |service: Option<SubService>| {
        service
            .map(|s| s.sale.to_string())
            .unwrap_or_default()
    };

    PassengerLine {
        nome: text(&passenger.name).trim().to_string(),
        neto: amount(passenger.net_cost),
        venduto: amount(passenger.sale_price),
        stato: text(&passenger.status),
        assicurazione: extra(passenger.insurance),
        espresso: extra(passenger.express),
        pagamento: display_date(sale_id, "passenger payment", passenger.payment_date.as_deref(), locale),
        attivazione: display_date(
            sale_id,
            "passenger activation",
            passenger.activation_date.as_deref(),
            locale,
        ),
    }
}

/// Format a stored date; null and unparseable values become the locale sentinel
///
/// Unparseable values are logged, never raised.
fn display_date(sale_id: SaleId, field: &str, raw: Option<&str>, locale: Locale) -> String {
    let Some(raw) = raw else {
        return locale.no_date().to_string();
    };

    match parse_stored_date(raw) {
        Some(date) => format_date_short(locale, date),
        None => {
            warn!(sale_id = %sale_id, field, value = raw, "malformed stored date, using sentinel");
            locale.no_date().to_string()
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn amount(value: Option<Decimal>) -> String {
    value
        .map(|d| d.to_string())
        .unwrap_or_else(|| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sale;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn issued() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn record() -> SaleRecord {
        let mut sale = Sale::new(SaleId(7), Utc.with_ymd_and_hms(2025, 2, 1, 9, 30, 0).unwrap());
        sale.client_name = Some("Mario Rossi".to_string());
        sale.payment_reference = Some("AB1234".to_string());
        sale.net_cost = Some(dec("150.00"));
        sale.sale_price = Some(dec("220"));
        SaleRecord {
            sale,
            passengers: Vec::new(),
            installments: Vec::new(),
            agent: None,
        }
    }

    fn installment(number: i32, due_date: Option<&str>, paid: bool) -> Installment {
        Installment {
            number,
            amount: Some(dec("75")),
            due_date: due_date.map(str::to_string),
            paid,
        }
    }

    #[test]
    fn test_defaults_never_null() {
        let data = project(&record(), Locale::English, issued());
        assert_eq!(data.indirizzo, "");
        assert_eq!(data.itinerario, "");
        assert_eq!(data.acconto, "0");
        assert_eq!(data.fee_agv, "0");
        assert_eq!(data.passeggero, "");

        let json = serde_json::to_value(&data).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_amounts_keep_source_scale() {
        let data = project(&record(), Locale::English, issued());
        assert_eq!(data.neto, "150.00");
        assert_eq!(data.venduto, "220");
    }

    #[test]
    fn test_installments_sorted_and_labelled() {
        let mut record = record();
        record.installments = vec![
            installment(2, None, false),
            installment(1, Some("2025-03-01"), true),
        ];
        let data = project(&record, Locale::English, issued());

        assert!(data.tiene_cuotas);
        assert_eq!(
            data.cuotas,
            vec![
                InstallmentLine {
                    numero: 1,
                    precio: "75".to_string(),
                    fecha: "01/03/2025".to_string(),
                    estado: "Paid".to_string(),
                },
                InstallmentLine {
                    numero: 2,
                    precio: "75".to_string(),
                    fecha: "No date".to_string(),
                    estado: "Pending".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_malformed_installment_date_uses_sentinel() {
        let mut record = record();
        record.installments = vec![installment(1, Some("not-a-date"), false)];
        assert_eq!(project(&record, Locale::English, issued()).cuotas[0].fecha, "No date");
        assert_eq!(project(&record, Locale::Spanish, issued()).cuotas[0].fecha, "Sin fecha");
    }

    #[test]
    fn test_no_installments_flag() {
        let data = project(&record(), Locale::English, issued());
        assert!(!data.tiene_cuotas);
        assert!(data.cuotas.is_empty());
    }

    #[test]
    fn test_serialized_keys_match_vocabulary() {
        let json = serde_json::to_value(project(&record(), Locale::English, issued())).unwrap();
        for key in [
            "cliente",
            "passeggero",
            "pnr",
            "itinerario",
            "servizio",
            "metodoPagamento",
            "agente",
            "neto",
            "venduto",
            "acconto",
            "daPagare",
            "feeAgv",
            "cuotas",
            "tieneCuotas",
            "codiceFiscale",
            "dataEmissione",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_dates() {
        let data = project(&record(), Locale::Italian, issued());
        assert_eq!(data.data_vendita, "1/2/2025");
        assert_eq!(data.data_emissione, "10 marzo 2025");
    }

    #[test]
    fn test_passengers() {
        let mut record = record();
        record.passengers = vec![
            Passenger {
                name: Some(" Luca Verdi ".to_string()),
                sale_price: Some(dec("110")),
                insurance: Some(SubService {
                    net: dec("5"),
                    sale: dec("9.90"),
                }),
                payment_date: Some("garbage".to_string()),
                ..Passenger::default()
            },
            Passenger {
                name: Some("Anna Neri".to_string()),
                ..Passenger::default()
            },
        ];
        let data = project(&record, Locale::English, issued());

        assert_eq!(data.passeggero, "Luca Verdi, Anna Neri");
        assert!(data.tiene_passeggeri);
        assert_eq!(data.passeggeri[0].assicurazione, "9.90");
        assert_eq!(data.passeggeri[0].espresso, "");
        assert_eq!(data.passeggeri[0].pagamento, "No date");
        assert_eq!(data.passeggeri[1].neto, "0");
    }

    #[test]
    fn test_agent_display_name() {
        let agent = |first: Option<&str>, last: Option<&str>, email: Option<&str>| Agent {
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            email: email.map(str::to_string),
        };

        assert_eq!(
            agent_display_name(Some(&agent(Some("Sara"), Some("Conti"), None)), Locale::English),
            "Sara Conti"
        );
        assert_eq!(
            agent_display_name(Some(&agent(Some("Sara"), None, None)), Locale::English),
            "Sara"
        );
        assert_eq!(
            agent_display_name(Some(&agent(Some("  "), None, Some("sara@agenzia.it"))), Locale::English),
            "sara@agenzia.it"
        );
        assert_eq!(
            agent_display_name(Some(&agent(None, None, None)), Locale::Italian),
            "Agente"
        );
        assert_eq!(agent_display_name(None, Locale::English), "Agent");
    }
}
