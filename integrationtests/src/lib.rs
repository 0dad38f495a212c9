pub mod payrelaymock;
