//! SOAP 1.1 plumbing for the memoQ services.
//!
//! memoQ Server is a WCF service using `basicHttpBinding`, so every call is
//! an HTTP POST of a SOAP 1.1 envelope with a `SOAPAction` header. Request
//! bodies follow the WCF data contract rules:
//!
//! - operation and data-contract elements live in [`MEMOQ_NS`],
//! - data-contract members are written in ordinal (alphabetical) order,
//! - unset optional members are omitted,
//! - `string[]` members use the `Serialization/Arrays` namespace.
//!
//! Responses are read into a small [`XmlNode`] tree; a `Fault` in the body
//! becomes [`SoapError::Fault`].

pub mod envelope;
pub mod reader;

pub use envelope::{DataContract, Element, Envelope};
pub use reader::{parse_document, parse_response, SoapError, SoapFault, XmlNode};

/// Namespace of memoQ operations and data contracts.
pub const MEMOQ_NS: &str = "http://kilgray.com/memoqservices/2007";

/// Namespace of memoQ enumerations.
pub const ENUM_NS: &str = "http://schemas.datacontract.org/2004/07/MemoQServices";

/// Namespace of serialized arrays (`string[]`, `Guid[]`).
pub const ARRAYS_NS: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";

/// SOAP 1.1 envelope namespace.
pub const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// XML Schema instance namespace (for `xsi:nil`).
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Content type of SOAP 1.1 requests.
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Builds the `SOAPAction` header value for an operation of a service contract.
///
/// ```
/// use memoq_wsapi::soap::soap_action;
///
/// assert_eq!(
///     soap_action("IServerProjectService", "GetProject"),
///     "\"http://kilgray.com/memoqservices/2007/IServerProjectService/GetProject\""
/// );
/// ```
pub fn soap_action(contract: &str, operation: &str) -> String {
    format!("\"{}/{}/{}\"", MEMOQ_NS, contract, operation)
}
