diesel::table! {
    supplier_embeddings (model, input_text) {
        model -> Text,
        input_text -> Text,
        embedding -> Binary,
        created_at -> Timestamp,
    }
}
