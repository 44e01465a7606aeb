use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};

/// One row of the address source file.
///
/// Columns that are absent from the header deserialize to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(rename = "ID_ENDERECO")]
    pub id: String,
    #[serde(rename = "ESTADO")]
    pub estado: String,
    #[serde(rename = "MUNICIPIO")]
    pub municipio: String,
    #[serde(rename = "DISTRITO")]
    pub distrito: String,
    #[serde(rename = "SUBDISTRITO")]
    pub subdistrito: String,
    #[serde(rename = "BAIRRO")]
    pub bairro: String,
    #[serde(rename = "CEP")]
    pub cep: String,
    #[serde(rename = "TIPO_LOGRADOURO")]
    pub tipo_logradouro: String,
    #[serde(rename = "RUA")]
    pub rua: String,
    #[serde(rename = "NUMERO")]
    pub numero: String,
    #[serde(rename = "COMPLEMENTO")]
    pub complemento: String,
    #[serde(rename = "LATITUDE")]
    pub latitude: String,
    #[serde(rename = "LONGITUDE")]
    pub longitude: String,
}

/// One generated installation, flattened with its address for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationRecord {
    pub address_id: Option<u64>,
    pub estado: String,
    pub municipio: String,
    pub distrito: String,
    pub subdistrito: String,
    pub bairro: String,
    pub cep: String,
    pub tipo_logradouro: String,
    pub rua: String,
    pub numero: String,
    pub complemento: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_optional_timestamp")]
    pub deleted_at: Option<NaiveDateTime>,
}

/// Output column order, as written in the header row.
pub const INSTALLATION_HEADERS: [&str; 15] = [
    "addressId",
    "estado",
    "municipio",
    "distrito",
    "subdistrito",
    "bairro",
    "cep",
    "tipoLogradouro",
    "rua",
    "numero",
    "complemento",
    "latitude",
    "longitude",
    "createdAt",
    "deletedAt",
];

impl InstallationRecord {
    pub fn new(
        address: &Address,
        created_at: NaiveDateTime,
        deleted_at: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            address_id: parse_address_id(&address.id),
            estado: address.estado.clone(),
            municipio: address.municipio.clone(),
            distrito: address.distrito.clone(),
            subdistrito: address.subdistrito.clone(),
            bairro: address.bairro.clone(),
            cep: address.cep.clone(),
            tipo_logradouro: address.tipo_logradouro.clone(),
            rua: address.rua.clone(),
            numero: address.numero.clone(),
            complemento: address.complemento.clone(),
            latitude: address.latitude.clone(),
            longitude: address.longitude.clone(),
            created_at,
            deleted_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Parses an address identifier made only of ASCII digits.
///
/// Anything else (empty, signed, decimal, whitespace) has no numeric id.
pub fn parse_address_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// ISO-8601 without offset; the fraction is only shown when non-zero.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

fn serialize_optional_timestamp<S: Serializer>(
    ts: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
        None => serializer.serialize_none(),
    }
}
