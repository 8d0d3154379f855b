mod call_list;
mod lifecycle;
