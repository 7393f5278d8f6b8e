mod error;
mod item;
pub mod keys;
mod marshal;
mod traits;

pub use error::{EncodingError, RepositoryError, Result, StoreError};
pub use item::{item_keys, AttributeValue, Item, INDEX_KEY_ATTR, PK_ATTR, SK_ATTR, TYPE_ATTR};
pub use marshal::{
    decode, decode_list, email_lookup_record, encode, encode_record, item_to_email_lookup,
    item_to_option, item_to_order, item_to_order_item,
    item_to_product, item_to_user, option_to_item, order_item_to_item, order_to_item,
    parse_status, product_to_item, status_to_string, user_to_item,
};
pub use traits::OrderedStore;
