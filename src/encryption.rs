//! The encryption provider: an external collaborator the Marshaler
//! consults for fields tagged `#[dynamorm(encrypted)]`. Not configured by
//! default -- a model with an encrypted field used against an `Executor`
//! with no provider attached fails closed with `EncryptionNotConfigured`
//! rather than silently storing plaintext.

use crate::error::Error;
use crate::marshal::AttributeValue;

/// Encrypts/decrypts individual attribute values at the field level. The
/// Marshaler calls this once per `encrypted`-tagged field, never on the
/// item as a whole, so a provider can use the field name as AAD/context.
pub trait EncryptionProvider: Send + Sync {
    fn encrypt(&self, field: &str, value: AttributeValue) -> Result<AttributeValue, Error>;
    fn decrypt(&self, field: &str, value: AttributeValue) -> Result<AttributeValue, Error>;
}

/// Applies `provider` to every attribute in `item` that `metadata` marks
/// `is_encrypted`, in place. Returns `EncryptionNotConfigured` if an
/// encrypted field is present and `provider` is `None`.
pub(crate) fn protect_item(
    item: &mut crate::marshal::Item,
    metadata: &crate::registry::Metadata,
    provider: Option<&dyn EncryptionProvider>,
) -> Result<(), Error> {
    for field in metadata.fields.values().filter(|f| f.is_encrypted) {
        let Some(value) = item.remove(&field.attribute_name) else { continue };
        let provider = provider.ok_or_else(|| Error::EncryptionNotConfigured(field.attribute_name.clone()))?;
        item.insert(field.attribute_name.clone(), provider.encrypt(&field.attribute_name, value)?);
    }
    Ok(())
}

/// Reverse of [`protect_item`]: decrypts every `is_encrypted` attribute
/// present in `item`, in place.
pub(crate) fn reveal_item(
    item: &mut crate::marshal::Item,
    metadata: &crate::registry::Metadata,
    provider: Option<&dyn EncryptionProvider>,
) -> Result<(), Error> {
    for field in metadata.fields.values().filter(|f| f.is_encrypted) {
        let Some(value) = item.remove(&field.attribute_name) else { continue };
        let provider = provider.ok_or_else(|| Error::EncryptionNotConfigured(field.attribute_name.clone()))?;
        item.insert(field.attribute_name.clone(), provider.decrypt(&field.attribute_name, value)?);
    }
    Ok(())
}
