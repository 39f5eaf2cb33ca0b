//! Hand-written Admin API operations.

/// Newest-first product listing with the current publication status.
pub const PRODUCTS: &str = r#"
query products($first: Int!, $after: String) {
  products(first: $first, after: $after, reverse: true) {
    edges {
      cursor
      node {
        id
        title
        handle
        resourcePublicationOnCurrentPublication {
          publication {
            name
            id
          }
          publishDate
          isPublished
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

/// Title and first image of the product a QR code points at.
pub const SUPPLEMENT_QR_CODE: &str = r#"
query supplementQRCode($id: ID!) {
  product(id: $id) {
    title
    images(first: 1) {
      nodes {
        altText
        url
      }
    }
  }
}
"#;

/// Creates the demo product.
pub const POPULATE_PRODUCT: &str = r#"
mutation populateProduct($input: ProductInput!) {
  productCreate(input: $input) {
    product {
      id
      title
      handle
      status
      variants(first: 10) {
        edges {
          node {
            id
            price
            barcode
            createdAt
            inventoryItem {
              tracked
            }
          }
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}
"#;
